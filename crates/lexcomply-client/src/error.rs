//! LexComply API client error types.

/// Banner text used when nothing more specific is available.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors from LexComply API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The API returned a non-2xx status.
    #[error("LexComply API {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The API answered 2xx but flagged the request as failed
    /// (`status: false` / `success: false`).
    #[error("LexComply API {endpoint} rejected the request: {message}")]
    Rejected { endpoint: String, message: String },
    /// The response body is JSON but not in any accepted shape.
    #[error("unexpected response from {endpoint}: {detail}")]
    UnexpectedShape { endpoint: String, detail: String },
    /// The response body is not JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint path {path}: {source}")]
    InvalidPath {
        path: String,
        source: url::ParseError,
    },
    /// The entity has no endpoint for this operation.
    #[error("{entity} does not support {operation}")]
    Unsupported {
        entity: &'static str,
        operation: &'static str,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ApiError {
    /// Message suitable for a snackbar or inline error.
    ///
    /// Server-provided messages are passed through; transport and shape
    /// problems collapse to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { body, status, .. } => message_from_body(body)
                .unwrap_or_else(|| format!("Request failed with status {status}. {GENERIC_FAILURE}")),
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Http { source, .. } if source.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            Self::Http { .. } => "Unable to reach the server. Please try again.".to_string(),
            Self::Unsupported { entity, operation } => {
                format!("{entity} does not support {operation}.")
            }
            Self::Config(e) => e.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull `message` or `error` out of a JSON error body.
pub(crate) fn message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "msg"]
        .iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
