//! Binary uploads.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `v2/multer/upload?from={kind}` | Store a file, returns its stored name |
//! | DELETE | `v2/multer/remove?from={kind}&file={stored}` | Remove a stored file |

use lexcomply_core::FileUpload;

use crate::envelope;
use crate::error::ApiError;
use crate::transport::Transport;

const UPLOAD_PATH: &str = "v2/multer/upload";
const REMOVE_PATH: &str = "v2/multer/remove";

/// Multipart part name the upload endpoint reads.
pub const FILE_PART: &str = "file";

/// Client for the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadClient {
    transport: Transport,
}

impl UploadClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Upload a file and return the name the server stored it under.
    ///
    /// Calls `POST {base_url}v2/multer/upload?from={from}`.
    pub async fn upload(&self, from: &str, file: &FileUpload) -> Result<String, ApiError> {
        let endpoint = format!("POST {UPLOAD_PATH}");
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        let form = reqwest::multipart::Form::new().part(FILE_PART, part);

        let body = self
            .transport
            .post_multipart(UPLOAD_PATH, &[("from".to_string(), from.to_string())], form)
            .await?;
        let stored = envelope::stored_name(&endpoint, &body)?;
        tracing::info!(%from, file = %file.file_name, %stored, "uploaded file");
        Ok(stored)
    }

    /// Remove a previously uploaded file.
    ///
    /// Calls `DELETE {base_url}v2/multer/remove?from={from}&file={stored}`.
    pub async fn remove(&self, from: &str, stored: &str) -> Result<(), ApiError> {
        self.transport
            .delete(
                REMOVE_PATH,
                &[
                    ("from".to_string(), from.to_string()),
                    ("file".to_string(), stored.to_string()),
                ],
            )
            .await?;
        tracing::info!(%from, %stored, "removed uploaded file");
        Ok(())
    }
}
