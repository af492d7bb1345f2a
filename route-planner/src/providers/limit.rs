//! Sliding-window rate limiter for the bike-path provider.
//!
//! The provider grants a fixed quota of calls per rolling minute. All
//! callers share one timestamp queue: before each call, timestamps older
//! than the window are pruned; if the quota is full, the caller suspends
//! until the oldest recorded call leaves the window. A caller over quota
//! therefore always waits instead of racing.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default provider quota: 40 calls per rolling minute.
pub const DEFAULT_MAX_CALLS: usize = 40;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Shared sliding-window limiter.
///
/// `acquire` suspends until a call slot is available, then records the call
/// timestamp. Waiting is cooperative; it is never an error.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_calls: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            timestamps: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Wait until a call slot is free, then claim it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut stamps = self.timestamps.lock().await;
                let now = Instant::now();
                Self::prune(&mut stamps, now, self.window);

                if stamps.len() < self.max_calls {
                    stamps.push_back(now);
                    return;
                }

                // Queue is full; the front entry is the oldest in-window
                // call. Sleep until it expires, then re-check.
                let oldest = stamps[0];
                (oldest + self.window).saturating_duration_since(now)
            };

            if wait.is_zero() {
                // The oldest entry expired between the check and now; loop
                // to prune and retry immediately.
                tokio::task::yield_now().await;
            } else {
                tracing::debug!(wait_ms = wait.as_millis() as u64, "bike-path quota full");
                tokio::time::sleep(wait).await;
            }
        }
    }

    /// Number of calls currently tracked inside the window.
    pub async fn tracked_calls(&self) -> usize {
        let mut stamps = self.timestamps.lock().await;
        Self::prune(&mut stamps, Instant::now(), self.window);
        stamps.len()
    }

    fn prune(stamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(&front) = stamps.front() {
            if now.duration_since(front) >= window {
                stamps.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALLS, DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn grants_up_to_quota_without_waiting() {
        let limiter = SlidingWindowLimiter::new(3, Duration::from_secs(60));
        let before = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now(), before, "no time should pass");
        assert_eq!(limiter.tracked_calls().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn over_quota_call_waits_for_oldest_to_expire() {
        let limiter = SlidingWindowLimiter::new(40, Duration::from_secs(60));

        // Fill the quota, with the calls landing 59.95s into the window so
        // the oldest expires 50ms from "now".
        for _ in 0..40 {
            limiter.acquire().await;
        }
        tokio::time::advance(Duration::from_millis(59_950)).await;

        let before = Instant::now();
        limiter.acquire().await;
        let waited = Instant::now().duration_since(before);
        assert!(
            waited >= Duration::from_millis(50),
            "waited only {waited:?}"
        );

        // Once the full window has passed the original 40 stamps, only the
        // newest call remains tracked.
        tokio::time::advance(Duration::from_secs(60) - waited).await;
        assert_eq!(limiter.tracked_calls().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn window_fully_recycles() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));
        limiter.acquire().await;
        limiter.acquire().await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(limiter.tracked_calls().await, 0);

        // Quota is fresh again.
        let before = Instant::now();
        limiter.acquire().await;
        assert_eq!(Instant::now(), before);
    }
}
