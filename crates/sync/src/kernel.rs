//! Retry and cancellation kernel shared by both pipelines.

use crate::error::SyncError;
use funding_core::VenueError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Maximum attempts per venue operation.
const MAX_ATTEMPTS: u32 = 3;

/// Runs a venue operation with linear back-off.
///
/// After failed attempt `k` the kernel sleeps `k` seconds before trying
/// again; the third attempt's error is returned as-is. Only transient
/// failures are retried (an empty result is an answer, not a fault), and
/// cancellation cuts through immediately, including mid-sleep.
pub async fn retry<T, F, Fut>(
    label: &str,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VenueError>>,
{
    let mut attempt: u32 = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_ATTEMPTS && e.is_transient() => {
                tracing::warn!("{}: attempt {} failed: {}", label, attempt, e);
                let backoff = Duration::from_secs(u64::from(attempt));
                tokio::select! {
                    () = cancel.cancelled() => return Err(SyncError::Cancelled),
                    () = tokio::time::sleep(backoff) => {}
                }
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
