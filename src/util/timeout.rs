//! Wall-clock bound for codec invocations.

use std::future::Future;
use std::time::Duration;

use crate::error::AudioError;

/// Run `future` for at most `duration`.
///
/// On expiry the future is dropped, which kills a child spawned with
/// `kill_on_drop`, and the call fails with [`AudioError::Timeout`] carrying
/// the limit in milliseconds. Errors from the future pass through unchanged.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, AudioError>>,
) -> Result<T, AudioError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            let limit_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(limit_ms, "codec invocation timed out");
            Err(AudioError::Timeout(limit_ms))
        }
    }
}
