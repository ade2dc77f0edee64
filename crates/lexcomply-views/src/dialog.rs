//! Add/edit dialog controller.
//!
//! One controller serves every entity: the schema supplies the fields,
//! the UI-to-API name mapping, the constant fields and the upload target.
//!
//! ## Submission
//!
//! 1. The draft is validated; the first failing rule is attached to its
//!    field (or to the form) and nothing is sent.
//! 2. If a file is attached it is uploaded first and its stored name goes
//!    into the payload.
//! 3. Exactly one create or update request is sent.
//! 4. On success a notice is raised, the dialog closes after
//!    [`DialogOptions::close_delay`] and the success callback runs.
//! 5. On failure the dialog stays open with the draft intact. A file
//!    uploaded in step 2 is removed again; a failed removal is logged and
//!    the write error is still the one reported.

use std::sync::Arc;
use std::time::Duration;

use lexcomply_core::registry::COMPLIANCE_COPY;
use lexcomply_core::{
    record_id, validate_draft, Draft, DraftMode, EntitySchema, FieldKind, FileUpload, Record,
    ValidationError,
};
use serde_json::Value;

use crate::backend::Backend;
use crate::error::ViewError;
use crate::notice::Notice;

/// Delay between a successful submit and the dialog closing.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(1000);

/// Tunables shared by the dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogOptions {
    pub close_delay: Duration,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            close_delay: DEFAULT_CLOSE_DELAY,
        }
    }
}

/// Invoked with the server response after a successful submit.
pub type SuccessCallback = Box<dyn FnMut(&Value) + Send>;

/// Headless add/edit dialog.
pub struct Dialog {
    backend: Arc<dyn Backend>,
    schema: &'static EntitySchema,
    mode: DraftMode,
    draft: Draft,
    file: Option<FileUpload>,
    options: DialogOptions,
    on_success: Option<SuccessCallback>,
    open: bool,
    loading: bool,
    error: Option<String>,
    field_error: Option<(String, String)>,
    notice: Option<Notice>,
}

impl Dialog {
    /// A create dialog seeded from field defaults.
    pub fn create(backend: Arc<dyn Backend>, schema: &'static EntitySchema) -> Self {
        Self::with_draft(backend, schema, DraftMode::Create, Draft::empty(schema))
    }

    /// An edit dialog seeded from a fetched record.
    pub fn edit(
        backend: Arc<dyn Backend>,
        schema: &'static EntitySchema,
        record: &Record,
    ) -> Result<Self, ViewError> {
        let id = record_id(record, schema.id_field).ok_or(ViewError::MissingId {
            entity: schema.label,
            id_field: schema.id_field,
        })?;
        Ok(Self::with_draft(
            backend,
            schema,
            DraftMode::Edit { id },
            Draft::from_record(schema, record),
        ))
    }

    /// The copy dialog for an existing compliance.
    pub fn copy_compliance(
        backend: Arc<dyn Backend>,
        compliance_id: &str,
    ) -> Result<Self, ViewError> {
        let mut dialog = Self::create(backend, &COMPLIANCE_COPY);
        dialog.set("complianceId", compliance_id)?;
        Ok(dialog)
    }

    fn with_draft(
        backend: Arc<dyn Backend>,
        schema: &'static EntitySchema,
        mode: DraftMode,
        draft: Draft,
    ) -> Self {
        Self {
            backend,
            schema,
            mode,
            draft,
            file: None,
            options: DialogOptions::default(),
            on_success: None,
            open: true,
            loading: false,
            error: None,
            field_error: None,
            notice: None,
        }
    }

    pub fn with_options(mut self, options: DialogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn on_success(mut self, callback: impl FnMut(&Value) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn file(&self) -> Option<&FileUpload> {
        self.file.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Form-level error: a cross-field rule or a server failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Error attached to a field, by UI name.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_error
            .as_ref()
            .filter(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Set a draft field by UI name. File fields only take a file through
    /// [`Dialog::attach_file`].
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ViewError> {
        if !self.open {
            return Err(ViewError::Closed);
        }
        if let Some(spec) = self.schema.field(field).filter(|f| f.kind == FieldKind::File) {
            let e = ValidationError::FileNotAttached {
                field: spec.name.to_string(),
                label: spec.label.to_string(),
            };
            self.record_validation(&e);
            return Err(e.into());
        }
        self.draft.set(self.schema, field, value)?;
        if self.field_error.as_ref().is_some_and(|(name, _)| name == field) {
            self.field_error = None;
        }
        Ok(())
    }

    /// Attach the file for the schema's upload field. The file is checked
    /// against the upload limits immediately.
    pub fn attach_file(&mut self, file: FileUpload) -> Result<(), ViewError> {
        if !self.open {
            return Err(ViewError::Closed);
        }
        let spec = self.schema.upload.ok_or_else(|| {
            ValidationError::Form(format!("{} does not take a file", self.schema.label))
        })?;
        if let Err(e) = file.check(&spec) {
            self.record_validation(&e);
            return Err(e.into());
        }
        self.draft
            .set(self.schema, spec.field, file.file_name.as_str())?;
        self.field_error = None;
        self.file = Some(file);
        Ok(())
    }

    fn record_validation(&mut self, e: &ValidationError) {
        match e.field() {
            Some(field) => self.field_error = Some((field.to_string(), e.to_string())),
            None => self.error = Some(e.to_string()),
        }
    }

    /// Validate, upload, write once, then close after the configured delay.
    pub async fn submit(&mut self) -> Result<Value, ViewError> {
        if !self.open {
            return Err(ViewError::Closed);
        }
        if self.loading {
            return Err(ViewError::Busy);
        }
        self.error = None;
        self.field_error = None;
        self.notice = None;

        if let Err(e) = validate_draft(self.schema, &self.draft, &self.mode) {
            tracing::debug!(entity = %self.schema.kind, error = %e, "draft rejected");
            self.record_validation(&e);
            return Err(e.into());
        }

        self.loading = true;
        let result = self.write().await;
        self.loading = false;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(entity = %self.schema.kind, error = %e, "dialog submit failed");
                let message = e.user_message();
                self.notice = Some(Notice::error(message.clone()));
                self.error = Some(message);
                return Err(e);
            }
        };

        let verb = if self.mode.is_create() { "added" } else { "updated" };
        self.notice = Some(Notice::success(format!(
            "{} {verb} successfully",
            self.schema.label
        )));
        tracing::info!(entity = %self.schema.kind, "{verb} record");

        tokio::time::sleep(self.options.close_delay).await;
        self.open = false;
        if let Some(callback) = self.on_success.as_mut() {
            callback(&response);
        }
        Ok(response)
    }

    async fn write(&mut self) -> Result<Value, ViewError> {
        let uploaded = match (&self.file, self.schema.upload) {
            (Some(file), Some(spec)) => {
                let stored = self.backend.upload(spec.from, file).await?;
                Some((spec, stored))
            }
            _ => None,
        };

        let mut draft = self.draft.clone();
        if let Some((spec, stored)) = &uploaded {
            draft.set(self.schema, spec.field, stored.as_str())?;
        }
        let payload = draft.to_payload(self.schema, &self.mode);

        let result = match self.mode {
            DraftMode::Create => self.backend.create(self.schema, &payload).await,
            DraftMode::Edit { .. } => self.backend.update(self.schema, &payload).await,
        };

        match result {
            Ok(response) => {
                if uploaded.is_some() {
                    self.draft = draft;
                    self.file = None;
                }
                Ok(response)
            }
            Err(e) => {
                if let Some((spec, stored)) = uploaded {
                    if let Err(cleanup) = self.backend.remove_upload(spec.from, &stored).await {
                        tracing::warn!(
                            from = spec.from,
                            %stored,
                            error = %cleanup,
                            "could not remove upload after failed write"
                        );
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Close without submitting.
    pub fn close(&mut self) {
        self.open = false;
        self.file = None;
    }
}
