//! Compliance endpoints that do not fit the generic entity client.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `complianceMaster/getCompliancePeriodicity?id={id}` | Stored periodicity |
//! | POST   | `complianceMaster/complianceTransfer` | Transfer |

use lexcomply_core::TransferRequest;
use serde_json::Value;

use crate::envelope;
use crate::error::ApiError;
use crate::transport::Transport;

const PERIODICITY_PATH: &str = "complianceMaster/getCompliancePeriodicity";
const TRANSFER_PATH: &str = "complianceMaster/complianceTransfer";

/// Client for compliance transfer.
#[derive(Debug, Clone)]
pub struct ComplianceClient {
    transport: Transport,
}

impl ComplianceClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch the stored periodicity of a compliance.
    ///
    /// Calls `GET {base_url}complianceMaster/getCompliancePeriodicity?id={id}`.
    pub async fn periodicity(&self, compliance_id: &str) -> Result<String, ApiError> {
        let body = self
            .transport
            .get(
                PERIODICITY_PATH,
                &[("id".to_string(), compliance_id.to_string())],
            )
            .await?;
        envelope::find_text(&body, &["periodicity", "compliance_periodicity"])
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ApiError::UnexpectedShape {
                endpoint: format!("GET {PERIODICITY_PATH}"),
                detail: "response carries no periodicity".to_string(),
            })
    }

    /// Submit a transfer. The request is not validated here; callers run
    /// [`TransferRequest::validate`] first.
    ///
    /// Calls `POST {base_url}complianceMaster/complianceTransfer`.
    pub async fn transfer(&self, req: &TransferRequest) -> Result<Value, ApiError> {
        let resp = self.transport.post_json(TRANSFER_PATH, req).await?;
        tracing::info!(
            compliance_id = %req.compliance_id,
            transfer_type = %req.transfer_type,
            "transferred compliance"
        );
        Ok(resp)
    }
}
