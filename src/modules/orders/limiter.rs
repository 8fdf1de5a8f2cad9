use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval rate limiter for outbound record store calls.
///
/// `acquire` suspends the caller until at least `min_interval` has elapsed
/// since the previous grant. The last-grant instant lives behind a mutex
/// that stays held across the wait, so concurrent callers are granted one
/// at a time and the spacing holds under load.
#[derive(Debug)]
pub struct IntervalLimiter {
    min_interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl IntervalLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Wait until the minimum interval since the last grant has elapsed,
    /// then record this grant.
    pub async fn acquire(&self) {
        let mut last_grant = self.last_grant.lock().await;

        if let Some(previous) = *last_grant {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tokio::time::sleep(ready_at - now).await;
            }
        }

        *last_grant = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let limiter = IntervalLimiter::new(Duration::from_millis(200));

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_sequential_acquires_are_spaced() {
        let limiter = IntervalLimiter::new(Duration::from_millis(50));

        limiter.acquire().await;
        let after_first = Instant::now();
        limiter.acquire().await;
        assert!(after_first.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_concurrent_acquires_are_spaced() {
        let limiter = Arc::new(IntervalLimiter::new(Duration::from_millis(50)));
        let grants: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let limiter = Arc::clone(&limiter);
            let grants = Arc::clone(&grants);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                grants.lock().await.push(Instant::now());
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut grants = grants.lock().await.clone();
        grants.sort();
        assert_eq!(grants.len(), 3);
        for pair in grants.windows(2) {
            let gap = pair[1].duration_since(pair[0]);
            assert!(
                gap >= Duration::from_millis(45),
                "grants only {:?} apart",
                gap
            );
        }
    }
}
