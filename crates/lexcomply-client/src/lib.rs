//! # lexcomply-client -- Typed Rust client for the LexComply admin API
//!
//! Provides typed access to the REST endpoints behind the admin panel:
//! - **Entities** via [`EntityClient`]: list, create, update, delete and
//!   options for every master table, driven by the entity's schema.
//! - **Compliance transfer** via [`ComplianceClient`].
//! - **Uploads** via [`UploadClient`] (`v2/multer/upload`).
//!
//! ## Behaviour
//!
//! - Certificates are validated unless [`ApiConfig::accept_invalid_certs`]
//!   was allowed by the environment gate in [`config`].
//! - Writes are sent exactly once. Reads are retried on transport errors
//!   only when `get_retries` is non-zero.
//! - A 2xx body flagged `status: false` is an error
//!   ([`ApiError::Rejected`]), as is a body in no recognised shape
//!   ([`ApiError::UnexpectedShape`]).

pub mod compliance;
pub mod config;
pub mod entities;
pub mod envelope;
pub mod error;
pub(crate) mod retry;
pub(crate) mod transport;
pub mod upload;

pub use compliance::ComplianceClient;
pub use config::{ApiConfig, ConfigError};
pub use entities::{EntityClient, ListQuery, SortOrder};
pub use envelope::{ListPage, SelectOption};
pub use error::ApiError;
pub use upload::UploadClient;

use std::time::Duration;

use lexcomply_core::{registry, EntityKind, EntitySchema};

use transport::Transport;

/// Top-level LexComply API client.
#[derive(Debug, Clone)]
pub struct LexClient {
    transport: Transport,
    compliance: ComplianceClient,
    uploads: UploadClient,
}

impl LexClient {
    /// Create a new client from configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| {
                        ApiError::Config(ConfigError::InvalidToken(
                            "token contains characters not allowed in a header".into(),
                        ))
                    })?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let transport = Transport::new(http, config.base_url, config.get_retries);
        Ok(Self {
            compliance: ComplianceClient::new(transport.clone()),
            uploads: UploadClient::new(transport.clone()),
            transport,
        })
    }

    /// Client for the entity described by `schema`.
    pub fn entity(&self, schema: &'static EntitySchema) -> EntityClient {
        EntityClient::new(self.transport.clone(), schema)
    }

    /// Client for a registered entity kind.
    pub fn kind(&self, kind: EntityKind) -> EntityClient {
        self.entity(registry::schema(kind))
    }

    /// Access the compliance transfer client.
    pub fn compliance(&self) -> &ComplianceClient {
        &self.compliance
    }

    /// Access the upload client.
    pub fn uploads(&self) -> &UploadClient {
        &self.uploads
    }
}
