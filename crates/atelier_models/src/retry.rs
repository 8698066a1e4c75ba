//! Retry with exponential backoff for upstream calls.

use atelier_core::HttpSettings;
use atelier_error::{AtelierResult, RetryableError};
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Run `operation`, retrying it while it fails with a retryable error.
///
/// At most `settings.max_retries` retries follow the first attempt. Backoff starts at
/// `retry_backoff_ms`, doubles, is capped at `max_delay_secs`, and is jittered.
/// Non-retryable errors are returned immediately.
pub async fn with_retry<T, F, Fut>(settings: &HttpSettings, mut operation: F) -> AtelierResult<T>
where
    F: FnMut() -> Fut + Send + Sync,
    Fut: Future<Output = AtelierResult<T>> + Send,
{
    let strategy = ExponentialBackoff::from_millis(settings.retry_backoff_ms.max(1))
        .factor(2)
        .max_delay(Duration::from_secs(settings.max_delay_secs.max(1)))
        .map(jitter)
        .take(settings.max_retries);

    Retry::spawn(strategy, || {
        let attempt = operation();
        async move {
            attempt.await.map_err(|e| {
                if e.is_retryable() {
                    warn!(error = %e, "Upstream call failed, will retry");
                    RetryError::Transient {
                        err: e,
                        retry_after: None,
                    }
                } else {
                    RetryError::Permanent(e)
                }
            })
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_error::{ConfigError, HttpError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(max_retries: usize) -> HttpSettings {
        HttpSettings {
            max_retries,
            retry_backoff_ms: 1,
            max_delay_secs: 1,
            ..HttpSettings::default()
        }
    }

    #[tokio::test]
    async fn test_transient_errors_retried_until_success() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(&fast(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(HttpError::with_status(503, "busy").into())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let calls = AtomicUsize::new(0);
        let result: AtelierResult<()> = with_retry(&fast(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(HttpError::new("connection reset").into()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: AtelierResult<()> = with_retry(&fast(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ConfigError::new("no key").into()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: AtelierResult<()> = with_retry(&fast(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(HttpError::with_status(400, "bad request").into()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
