//! Two-step compliance transfer wizard.
//!
//! Step one looks up the compliance's stored periodicity and preselects a
//! transfer type from it. Step two collects the fields that type needs and
//! submits a single transfer request. There is no way back to step one;
//! closing the wizard resets it.

use std::sync::Arc;

use lexcomply_core::{TransferRequest, TransferType, ValidationError};
use serde_json::Value;

use crate::backend::Backend;
use crate::dialog::DialogOptions;
use crate::error::ViewError;
use crate::notice::Notice;

/// Wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Enter a compliance id and fetch its periodicity.
    Lookup,
    /// Choose a transfer type and fill its fields.
    Details,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Details => "details",
        }
    }
}

/// Headless transfer wizard.
pub struct TransferWizard {
    backend: Arc<dyn Backend>,
    options: DialogOptions,
    step: WizardStep,
    compliance_id: String,
    periodicity: Option<String>,
    transfer_type: Option<TransferType>,
    due_date: String,
    event_name: String,
    event_periodicity: String,
    open: bool,
    loading: bool,
    error: Option<String>,
    notice: Option<Notice>,
}

impl TransferWizard {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            options: DialogOptions::default(),
            step: WizardStep::Lookup,
            compliance_id: String::new(),
            periodicity: None,
            transfer_type: None,
            due_date: String::new(),
            event_name: String::new(),
            event_periodicity: String::new(),
            open: true,
            loading: false,
            error: None,
            notice: None,
        }
    }

    pub fn with_options(mut self, options: DialogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn compliance_id(&self) -> &str {
        &self.compliance_id
    }

    /// Periodicity returned by the lookup, as the server spelled it.
    pub fn periodicity(&self) -> Option<&str> {
        self.periodicity.as_deref()
    }

    pub fn transfer_type(&self) -> Option<TransferType> {
        self.transfer_type
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn require(&self, step: WizardStep, action: &'static str) -> Result<(), ViewError> {
        if !self.open {
            return Err(ViewError::Closed);
        }
        if self.step != step {
            return Err(ViewError::WrongStep {
                action,
                step: self.step.as_str(),
            });
        }
        Ok(())
    }

    pub fn set_compliance_id(&mut self, id: impl Into<String>) -> Result<(), ViewError> {
        self.require(WizardStep::Lookup, "setting the compliance")?;
        self.compliance_id = id.into();
        Ok(())
    }

    /// Fetch the periodicity and move to step two. Returns the preselected
    /// transfer type, if the periodicity maps to one. On failure the wizard
    /// stays on step one with an error.
    pub async fn lookup(&mut self) -> Result<Option<TransferType>, ViewError> {
        self.require(WizardStep::Lookup, "lookup")?;
        if self.loading {
            return Err(ViewError::Busy);
        }
        let id = self.compliance_id.trim().to_string();
        if id.is_empty() {
            let e = ValidationError::Required {
                field: "complianceId".into(),
                label: "Compliance".into(),
            };
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        self.error = None;
        self.loading = true;
        let result = self.backend.periodicity(&id).await;
        self.loading = false;

        let periodicity = result.map_err(|e| {
            self.error = Some(e.user_message());
            ViewError::from(e)
        })?;
        let preselected = TransferType::from_periodicity(&periodicity);
        tracing::debug!(compliance_id = %id, %periodicity, ?preselected, "periodicity looked up");

        self.compliance_id = id;
        self.periodicity = Some(periodicity);
        self.transfer_type = preselected;
        self.step = WizardStep::Details;
        Ok(preselected)
    }

    pub fn select_type(&mut self, transfer_type: TransferType) -> Result<(), ViewError> {
        self.require(WizardStep::Details, "choosing a transfer type")?;
        self.transfer_type = Some(transfer_type);
        Ok(())
    }

    pub fn set_due_date(&mut self, date: impl Into<String>) -> Result<(), ViewError> {
        self.require(WizardStep::Details, "setting the due date")?;
        self.due_date = date.into();
        Ok(())
    }

    pub fn set_event_name(&mut self, name: impl Into<String>) -> Result<(), ViewError> {
        self.require(WizardStep::Details, "setting the event")?;
        self.event_name = name.into();
        Ok(())
    }

    pub fn set_event_periodicity(&mut self, periodicity: impl Into<String>) -> Result<(), ViewError> {
        self.require(WizardStep::Details, "setting the event periodicity")?;
        self.event_periodicity = periodicity.into();
        Ok(())
    }

    /// The request step two would submit. Only the fields the chosen type
    /// uses are carried.
    pub fn request(&self) -> Result<TransferRequest, ValidationError> {
        let transfer_type = self.transfer_type.ok_or_else(|| ValidationError::Required {
            field: "transferType".into(),
            label: "Transfer type".into(),
        })?;
        let keep = |used: bool, value: &str| {
            Some(value.trim().to_string()).filter(|v| used && !v.is_empty())
        };
        let req = TransferRequest {
            compliance_id: self.compliance_id.clone(),
            transfer_type,
            due_date: keep(transfer_type.needs_due_date(), &self.due_date),
            event_name: keep(transfer_type.needs_event(), &self.event_name),
            event_periodicity: keep(transfer_type.needs_event(), &self.event_periodicity),
        };
        req.validate()?;
        Ok(req)
    }

    /// Submit the transfer, then close and reset after the close delay.
    pub async fn submit(&mut self) -> Result<Value, ViewError> {
        self.require(WizardStep::Details, "submit")?;
        if self.loading {
            return Err(ViewError::Busy);
        }
        self.error = None;
        let req = match self.request() {
            Ok(req) => req,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.loading = true;
        let result = self.backend.transfer(&req).await;
        self.loading = false;

        let response = result.map_err(|e| {
            tracing::warn!(compliance_id = %req.compliance_id, error = %e, "transfer failed");
            self.error = Some(e.user_message());
            ViewError::from(e)
        })?;

        tracing::info!(
            compliance_id = %req.compliance_id,
            transfer_type = %req.transfer_type,
            "compliance transferred"
        );
        let notice = Notice::success("Compliance transferred successfully");
        self.notice = Some(notice.clone());
        tokio::time::sleep(self.options.close_delay).await;
        self.close();
        self.notice = Some(notice);
        Ok(response)
    }

    /// Close and return to an empty step one.
    pub fn close(&mut self) {
        self.step = WizardStep::Lookup;
        self.compliance_id.clear();
        self.periodicity = None;
        self.transfer_type = None;
        self.due_date.clear();
        self.event_name.clear();
        self.event_periodicity.clear();
        self.loading = false;
        self.error = None;
        self.notice = None;
        self.open = false;
    }

    /// Open again after a close.
    pub fn reopen(&mut self) {
        self.open = true;
    }
}
