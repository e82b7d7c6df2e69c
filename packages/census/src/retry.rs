//! HTTP retry helpers for transient upstream errors.
//!
//! Census requests go through [`send_json`] rather than calling
//! `reqwest::RequestBuilder::send()` directly, so timeouts, connection
//! resets, rate limiting, and server errors are retried with exponential
//! backoff. The budget is small because a map view is waiting on the
//! response.
//!
//! ```ignore
//! let body = retry::send_json(|| client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use crate::CensusError;

/// Maximum number of retries after the first attempt.
///
/// With backoff of 500ms, 1s, 2s the total wait before giving up is 3.5
/// seconds on top of the per-request timeouts.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff.
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Maximum length of an upstream error body kept in [`CensusError::Upstream`].
const BODY_PREVIEW_LEN: usize = 500;

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (builders are consumed by `.send()`).
///
/// # Errors
///
/// Returns [`CensusError`] if the request still fails after all retries,
/// the upstream returns a non-retryable status, or the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, CensusError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_with_retry(&build_request, MAX_RETRIES).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Delay before retry number `attempt` (1-based).
fn backoff(attempt: u32) -> Duration {
    BASE_DELAY * (1u32 << (attempt - 1).min(16))
}

#[allow(clippy::future_not_send)]
async fn send_with_retry<F>(
    build_request: &F,
    max_retries: u32,
) -> Result<reqwest::Response, CensusError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }
        let can_retry = attempt < max_retries;
        attempt += 1;

        let response = match build_request().send().await {
            Ok(response) => response,
            Err(e) if can_retry && is_transient(&e) => {
                log::warn!("  transient error: {e}");
                continue;
            }
            Err(e) => return Err(CensusError::Http(e)),
        };

        let status = response.status();
        if status.is_success() || status.is_redirection() {
            return Ok(response);
        }

        if can_retry && is_retryable_status(status) {
            log::warn!("  HTTP {status} from upstream");
            continue;
        }

        let body = response.text().await.unwrap_or_default();
        return Err(CensusError::Upstream {
            status: status.as_u16(),
            body: truncate(&body, BODY_PREVIEW_LEN),
        });
    }
}

/// Returns `true` for 429 and 5xx responses.
fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
