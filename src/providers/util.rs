use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Transport-level failures worth another attempt. Status and decode errors are not.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Retries an async request on transient transport failures
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay`: Pause between retry attempts
///
/// # Returns
/// Either the successful result or the last error
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay: Duration,
) -> Result<T, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries || !is_transient(&err) {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt,
                    retries + 1,
                    err
                );
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn unreachable_request() -> Result<String, reqwest::Error> {
        // Port 9 on localhost is closed in test environments
        reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await?
            .text()
            .await
    }

    #[tokio::test]
    async fn test_retries_transport_failures() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                unreachable_request()
            },
            2,
            Duration::from_millis(1),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_success() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, reqwest::Error>(42) }
            },
            3,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
