//! Shared request plumbing: URL joining, status handling, body decoding and
//! the `status: false` check. Every sub-client goes through [`Transport`],
//! so each endpoint gets identical error mapping and logging.

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::envelope;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    get_retries: u32,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, get_retries: u32) -> Self {
        Self {
            http,
            base_url,
            get_retries,
        }
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidPath {
                path: path.to_string(),
                source: e,
            })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    /// `GET path?query`, retried on transport errors if configured.
    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let endpoint = format!("GET {path}");
        let url = self.url(path, query)?;
        tracing::debug!(%endpoint, url = %url, "sending request");

        let resp = crate::retry::retry_send(self.get_retries, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        finish(endpoint, resp).await
    }

    /// `POST path` with a JSON body. Never retried.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("POST {path}");
        let url = self.url(path, &[])?;
        tracing::debug!(%endpoint, "sending request");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        finish(endpoint, resp).await
    }

    /// `POST path?query` with a multipart body. Never retried.
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        query: &[(String, String)],
        form: reqwest::multipart::Form,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("POST {path}");
        let url = self.url(path, query)?;
        tracing::debug!(%endpoint, "sending multipart request");

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        finish(endpoint, resp).await
    }

    /// `DELETE path?query`. Never retried.
    pub(crate) async fn delete(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let endpoint = format!("DELETE {path}");
        let url = self.url(path, query)?;
        tracing::debug!(%endpoint, "sending request");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        finish(endpoint, resp).await
    }
}

/// Map status, decode JSON (an empty body decodes to `null`), and turn a
/// 2xx `status: false` body into [`ApiError::Rejected`].
async fn finish(endpoint: String, resp: reqwest::Response) -> Result<Value, ApiError> {
    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApiError::Http {
        endpoint: endpoint.clone(),
        source: e,
    })?;

    if !status.is_success() {
        tracing::warn!(%endpoint, status = status.as_u16(), "LexComply API returned an error status");
        return Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
            body: text,
        });
    }

    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?
    };

    if let Some(message) = envelope::rejection(&body) {
        tracing::warn!(%endpoint, %message, "LexComply API rejected the request");
        return Err(ApiError::Rejected { endpoint, message });
    }
    Ok(body)
}
