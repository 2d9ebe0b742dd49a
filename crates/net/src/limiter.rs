//! Global request spacing

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum wall-clock distance between request departures
///
/// The last departure time is guarded by a single lock that is held while
/// the caller waits, so departures are serialised across every task sharing
/// the limiter. There is no fairness guarantee among waiting callers.
#[derive(Debug)]
pub struct RateLimiter {
    min_distance: Duration,
    last_departure: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_distance: Duration) -> Self {
        Self {
            min_distance,
            last_departure: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn min_distance(&self) -> Duration {
        self.min_distance
    }

    /// Block until a request may depart, then record the departure
    ///
    /// Returns the recorded departure time.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_departure.lock().await;
        if let Some(previous) = *last {
            let eligible = previous + self.min_distance;
            if Instant::now() < eligible {
                tokio::time::sleep_until(eligible).await;
            }
        }
        let departure = Instant::now();
        *last = Some(departure);
        departure
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_acquire_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_departures_are_spaced() {
        let min_distance = Duration::from_millis(10);
        let limiter = Arc::new(RateLimiter::new(min_distance));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move { limiter.acquire().await }));
        }

        let mut departures = Vec::new();
        for handle in handles {
            departures.push(handle.await.unwrap());
        }
        departures.sort();

        for pair in departures.windows(2) {
            assert!(pair[1] - pair[0] >= min_distance);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_remaining_distance() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        let first = limiter.acquire().await;
        let second = limiter.acquire().await;
        assert!(second - first >= Duration::from_millis(50));
    }
}
