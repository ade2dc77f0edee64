//! LexComply API client configuration.
//!
//! One base URL serves every endpoint. Certificates are validated unless
//! the operator opts out explicitly *and* the deployment is not
//! production; any other combination is a configuration error.

use url::Url;
use zeroize::Zeroizing;

/// Default API base used when `LEXCOMPLY_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://api.lexcomply.local/";

/// Configuration for connecting to the LexComply API.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are joined onto it. Always ends with `/`.
    pub base_url: Url,
    /// Optional bearer token.
    pub api_token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts for failed reads. Writes are never retried.
    pub get_retries: u32,
    /// Accept invalid TLS certificates. Only reachable through
    /// [`insecure_tls_allowed`].
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("get_retries", &self.get_retries)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LEXCOMPLY_API_URL` (default: [`DEFAULT_BASE_URL`])
    /// - `LEXCOMPLY_API_TOKEN` (optional)
    /// - `LEXCOMPLY_TIMEOUT_SECS` (default: 30)
    /// - `LEXCOMPLY_GET_RETRIES` (default: 0)
    /// - `LEXCOMPLY_ENV` (default: `production`)
    /// - `LEXCOMPLY_INSECURE_TLS` (`1`/`true` to skip certificate checks;
    ///   rejected in production)
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("LEXCOMPLY_ENV").unwrap_or_else(|_| "production".to_string());
        let insecure = std::env::var("LEXCOMPLY_INSECURE_TLS").ok();

        Ok(Self {
            base_url: env_url("LEXCOMPLY_API_URL", DEFAULT_BASE_URL)?,
            api_token: std::env::var("LEXCOMPLY_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(Zeroizing::new),
            timeout_secs: std::env::var("LEXCOMPLY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            get_retries: std::env::var("LEXCOMPLY_GET_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            accept_invalid_certs: insecure_tls_allowed(&environment, insecure.as_deref())?,
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base(base_url)
                .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e))?,
            api_token: None,
            timeout_secs: 5,
            get_retries: 0,
            accept_invalid_certs: false,
        })
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base(base_url)
            .map_err(|e| ConfigError::InvalidUrl("base_url".to_string(), e))?;
        Ok(self)
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }
}

/// Decide whether certificate validation may be disabled.
///
/// Returns `Ok(false)` when the flag is absent or off, `Ok(true)` when it
/// is on outside production, and an error when it is on in production.
pub fn insecure_tls_allowed(environment: &str, flag: Option<&str>) -> Result<bool, ConfigError> {
    let requested = matches!(
        flag.map(|f| f.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    );
    if !requested {
        return Ok(false);
    }
    let env = environment.trim().to_ascii_lowercase();
    if env.is_empty() || env == "production" || env == "prod" {
        return Err(ConfigError::InsecureTlsInProduction);
    }
    tracing::warn!(environment = %env, "TLS certificate validation disabled");
    Ok(true)
}

fn normalize_base(raw: &str) -> Result<Url, String> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| e.to_string())
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    normalize_base(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("LEXCOMPLY_INSECURE_TLS is not allowed when LEXCOMPLY_ENV is production")]
    InsecureTlsInProduction,
    #[error("invalid API token: {0}")]
    InvalidToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = ApiConfig::local_mock("http://127.0.0.1:9000").unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.timeout_secs, 5);
        assert!(!cfg.accept_invalid_certs);
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let cfg = ApiConfig::local_mock("http://127.0.0.1:9000")
            .unwrap()
            .with_base_url("https://api.example.com/v1")
            .unwrap();
        let joined = cfg.base_url.join("actMaster/actMasterList").unwrap();
        assert_eq!(joined.as_str(), "https://api.example.com/v1/actMaster/actMasterList");
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("NONEXISTENT_VAR_LEXCOMPLY_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            ApiConfig::local_mock("not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }

    #[test]
    fn insecure_tls_is_off_by_default() {
        assert!(!insecure_tls_allowed("development", None).unwrap());
        assert!(!insecure_tls_allowed("production", Some("0")).unwrap());
    }

    #[test]
    fn insecure_tls_requires_non_production() {
        assert!(insecure_tls_allowed("staging", Some("1")).unwrap());
        assert!(insecure_tls_allowed("development", Some("TRUE")).unwrap());
        assert!(matches!(
            insecure_tls_allowed("production", Some("1")),
            Err(ConfigError::InsecureTlsInProduction)
        ));
        assert!(insecure_tls_allowed("", Some("yes")).is_err());
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ApiConfig::local_mock("http://127.0.0.1:9000")
            .unwrap()
            .with_token("super-secret");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
