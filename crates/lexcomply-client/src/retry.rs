//! Retry with exponential backoff for read requests.
//!
//! Only `GET` goes through here, and only when the configuration asks for
//! retries (the default is none). Only transport failures (connection
//! refused, timeouts) are retried; any HTTP response, including a 5xx, is
//! returned to the caller as-is.

use std::time::Duration;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Send an HTTP request, retrying transport errors up to `max_retries`
/// extra times.
pub(crate) async fn retry_send<F, Fut>(
    max_retries: u32,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..max_retries {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt.min(10)));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    "LexComply API request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    // Final attempt, no more retries.
    f().await
}
