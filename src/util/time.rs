use ::time::OffsetDateTime;
use ::time::format_description::well_known::Rfc3339;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub fn format_rfc3339(t: OffsetDateTime) -> Result<String, ::time::error::Format> {
    t.format(&Rfc3339)
}

pub async fn sleep_millis(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Call `f` up to `attempts` times, sleeping `delay` between failures.
///
/// Returns `Ok(())` on the first success (or immediately when `attempts` is
/// 0), otherwise the error from the final attempt.
pub async fn retry<E, F, Fut>(attempts: usize, delay: Duration, mut f: F) -> Result<(), E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    for attempt in 1..=attempts {
        match f().await {
            Ok(()) => return Ok(()),
            Err(e) if attempt == attempts => return Err(e),
            Err(e) => {
                debug!(attempt, attempts, error = %e, "Attempt failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::time::macros::datetime;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_format_rfc3339() {
        let t = datetime!(2024-01-02 03:04:05 UTC);
        assert_eq!(format_rfc3339(t).unwrap(), "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_now_utc_is_utc() {
        assert!(now_utc().offset().is_utc());
    }

    #[tokio::test]
    async fn test_sleep_millis_waits() {
        let started = std::time::Instant::now();
        sleep_millis(10).await;
        assert!(started.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), String> = retry(5, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n < 3 { Err(format!("attempt {n}")) } else { Ok(()) } }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_returns_last_error() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), String> = retry(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(format!("attempt {n}")) }
        })
        .await;

        assert_eq!(result, Err("attempt 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_zero_attempts_never_calls() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), String> = retry(0, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("unreachable".to_string()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
