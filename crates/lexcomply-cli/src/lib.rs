//! # lexcomply-cli -- Command-line client for the LexComply admin API
//!
//! Provides the `lexcomply` binary. Every write goes through the same
//! controllers the admin panel uses, so validation, field mapping and
//! upload cleanup behave identically.
//!
//! ## Subcommands
//!
//! - `lexcomply entities` -- Entity kinds and their fields.
//! - `lexcomply list <kind>` -- Fetch, filter, sort and page a list.
//! - `lexcomply create <kind> --set k=v [--file path]` -- Create a record.
//! - `lexcomply update <kind> <id> --set k=v` -- Edit a record.
//! - `lexcomply delete <kind> <id>` -- Delete a record.
//! - `lexcomply options <kind>` -- Selector options (e.g. `options acts`).
//! - `lexcomply transfer <compliance-id>` -- Two-step compliance transfer.
//! - `lexcomply copy <compliance-id> --act <id>` -- Copy a compliance.
//!
//! ## Exit codes
//!
//! `0` success, `1` request or configuration failure, `2` validation error.

pub mod catalog;
pub mod options;
pub mod output;
pub mod records;
pub mod transfer;

use std::sync::Arc;

use anyhow::{Context, Result};
use lexcomply_client::{ApiConfig, LexClient};
use lexcomply_core::{EntityKind, ValidationError};
use lexcomply_views::{Backend, DialogOptions, ViewError};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_VALIDATION: u8 = 2;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Print JSON instead of a table.
    pub json: bool,
    /// Overrides `LEXCOMPLY_API_URL`.
    pub base_url: Option<String>,
    /// Environment variable holding the bearer token, read instead of
    /// `LEXCOMPLY_API_TOKEN`.
    pub token_env: Option<String>,
}

impl GlobalOpts {
    /// Build the API configuration from the environment and the flags.
    pub fn config(&self) -> Result<ApiConfig> {
        let mut config = ApiConfig::from_env().context("invalid LexComply configuration")?;
        if let Some(url) = &self.base_url {
            config = config
                .with_base_url(url)
                .with_context(|| format!("invalid --base-url {url}"))?;
        }
        if let Some(var) = &self.token_env {
            let token = std::env::var(var)
                .with_context(|| format!("token variable {var} is not set"))?;
            config = config.with_token(token);
        }
        Ok(config)
    }

    /// Connect to the API.
    pub fn backend(&self) -> Result<Arc<dyn Backend>> {
        let config = self.config()?;
        tracing::debug!(?config, "connecting");
        let client = LexClient::new(config).context("failed to build HTTP client")?;
        Ok(Arc::new(client))
    }
}

/// Dialogs driven from the command line close immediately.
pub fn cli_dialog_options() -> DialogOptions {
    DialogOptions {
        close_delay: std::time::Duration::ZERO,
    }
}

/// Parse an entity kind, also accepting plurals (`acts`, `act-categories`).
pub fn parse_kind(s: &str) -> Result<EntityKind, String> {
    let err = match s.parse::<EntityKind>() {
        Ok(kind) => return Ok(kind),
        Err(e) => e,
    };
    let singulars = [
        s.strip_suffix("ies").map(|stem| format!("{stem}y")),
        s.strip_suffix('s').map(str::to_string),
    ];
    singulars
        .into_iter()
        .flatten()
        .find_map(|singular| singular.parse::<EntityKind>().ok())
        .ok_or(err)
}

/// Parse a `field=value` assignment.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got \"{s}\""))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in \"{s}\""));
    }
    Ok((field.to_string(), value.to_string()))
}

/// Exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let validation = err.chain().any(|cause| {
        cause.downcast_ref::<ValidationError>().is_some()
            || cause
                .downcast_ref::<ViewError>()
                .is_some_and(ViewError::is_validation)
    });
    if validation {
        EXIT_VALIDATION
    } else {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_with_plurals() {
        assert_eq!(parse_kind("acts").unwrap(), EntityKind::Act);
        assert_eq!(parse_kind("act").unwrap(), EntityKind::Act);
        assert_eq!(parse_kind("act-types").unwrap(), EntityKind::ActType);
        assert_eq!(parse_kind("news").unwrap(), EntityKind::Dossier);
        assert_eq!(parse_kind("act-categories").unwrap(), EntityKind::ActCategory);
        assert_eq!(parse_kind("compliance-copies").unwrap(), EntityKind::ComplianceCopy);
        assert!(parse_kind("widgets").is_err());
    }

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("description=a=b").unwrap(),
            ("description".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("state=").unwrap(),
            ("state".to_string(), String::new())
        );
        assert!(parse_assignment("name").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn validation_errors_exit_with_two() {
        let err = anyhow::Error::new(ViewError::Validation(ValidationError::Form(
            "bad".into(),
        )))
        .context("create failed");
        assert_eq!(exit_code(&err), EXIT_VALIDATION);

        let err = anyhow::Error::new(ViewError::Busy);
        assert_eq!(exit_code(&err), EXIT_FAILURE);
    }
}
