//! Retry utilities for transient RMS API failures.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! 429 Rate Limited responses. Non-retriable errors (parse failures, 404s,
//! data-quality errors) are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use crate::error::RmsError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`RmsError::RateLimited`] — HTTP 429; the server has asked us to back off.
/// - [`RmsError::Http`] — network-level failure (connection reset, timeout, etc.).
/// - [`RmsError::UnexpectedStatus`] with a 5xx status — server-side trouble.
///
/// Everything else — 404s, other 4xx statuses, deserialization and
/// data-quality errors, the pagination guard — is propagated immediately;
/// retrying would return the same result.
fn is_retriable(err: &RmsError) -> bool {
    match err {
        RmsError::RateLimited { .. } | RmsError::Http(_) => true,
        RmsError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs *
/// 2^attempt` seconds and tries again, up to `max_retries` additional
/// attempts after the first try. If all retries are exhausted the last error
/// is returned. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, RmsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RmsError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds, capped to avoid
        // overflow on extreme configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient RMS error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
