//! Bounded execution of storage operations.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Run `operation` within `limit`, mapping expiry through `timeout`.
///
/// Dropping the future on expiry drops any open transaction with it; the
/// connection returns to the pool and the server rolls the work back.
pub(super) async fn within<F, T, E, M>(
    limit: Duration,
    label: &'static str,
    operation: F,
    timeout: M,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    M: FnOnce(String) -> E,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            let limit_ms = limit.as_millis();
            warn!(operation = label, limit_ms, "storage operation timed out");
            Err(timeout(format!("{label} exceeded {limit_ms}ms")))
        }
    }
}
