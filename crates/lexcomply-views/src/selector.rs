//! Option selector with type-ahead.

use std::sync::Arc;

use lexcomply_client::SelectOption;
use lexcomply_core::{EntitySchema, ValidationError};

use crate::backend::Backend;
use crate::error::ViewError;

/// Headless selector over another entity's options (e.g. the act picker).
pub struct OptionSelector {
    backend: Arc<dyn Backend>,
    schema: &'static EntitySchema,
    options: Vec<SelectOption>,
    loaded: bool,
    query: String,
    selected: Option<usize>,
    loading: bool,
    error: Option<String>,
}

impl OptionSelector {
    pub fn new(backend: Arc<dyn Backend>, schema: &'static EntitySchema) -> Self {
        Self {
            backend,
            schema,
            options: Vec::new(),
            loaded: false,
            query: String::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch options once. Later calls are no-ops until [`reload`](Self::reload).
    pub async fn load(&mut self) -> Result<(), ViewError> {
        if self.loaded {
            return Ok(());
        }
        self.reload().await
    }

    pub async fn reload(&mut self) -> Result<(), ViewError> {
        self.loading = true;
        let result = self.backend.options(self.schema).await;
        self.loading = false;
        self.selected = None;

        match result {
            Ok(options) => {
                tracing::debug!(entity = %self.schema.kind, count = options.len(), "options loaded");
                self.options = options;
                self.loaded = true;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(entity = %self.schema.kind, error = %e, "options fetch failed");
                self.options.clear();
                self.loaded = false;
                self.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Options whose label contains the query, ignoring case.
    pub fn visible(&self) -> Vec<&SelectOption> {
        let needle = self.query.trim().to_lowercase();
        self.options
            .iter()
            .filter(|o| needle.is_empty() || o.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Select by value. Values outside the loaded options are rejected.
    pub fn select(&mut self, value: &str) -> Result<&SelectOption, ViewError> {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => {
                self.selected = Some(index);
                Ok(&self.options[index])
            }
            None => Err(ValidationError::NotAnOption {
                field: self.schema.kind.as_str().to_string(),
                label: self.schema.label.to_string(),
                value: value.to_string(),
                allowed: self
                    .options
                    .iter()
                    .map(|o| o.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
            .into()),
        }
    }

    pub fn selected(&self) -> Option<&SelectOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.query.clear();
    }
}
