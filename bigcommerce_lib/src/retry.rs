//! Caller-side retry after throttling.
//!
//! The fetcher never retries a 429 itself. Callers that want automatic
//! recovery re-invoke the whole call through [`retry_throttled`], which waits
//! the reported `retry_after` between attempts.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::error::FetchError;

/// Wait used when a throttling failure carried no reset time.
pub const FALLBACK_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Runs `operation`, re-invoking it after each throttling failure up to
/// `max_retries` times. Any other error, or exhausting the retries, returns
/// the error.
///
/// Each wait is the failure's `retry_after` (or [`FALLBACK_RETRY_AFTER`])
/// plus up to 250ms of jitter.
pub async fn retry_throttled<F, Fut, T>(
    label: &str,
    max_retries: u32,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_throttled() && attempt < max_retries => {
                attempt += 1;
                let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
                let wait = err.retry_after().unwrap_or(FALLBACK_RETRY_AFTER) + jitter;
                tracing::warn!(
                    "{} throttled (attempt {}/{}), retrying in {:.1}s",
                    label,
                    attempt,
                    max_retries,
                    wait.as_secs_f64()
                );
                sleep(wait).await;
            }
            Err(err) => return Err(err),
        }
    }
}
