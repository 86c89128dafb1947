use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Enforces a minimum interval between successive calls
///
/// Callers are served one at a time. The first call passes straight through;
/// later calls wait until `min_interval` has elapsed since the previous one.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Waits for this caller's slot
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_immediate() {
        let throttle = Throttle::new(Duration::from_millis(250));
        let start = Instant::now();
        throttle.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_calls_are_spaced() {
        let throttle = Throttle::new(Duration::from_millis(250));
        let start = Instant::now();

        throttle.wait().await;
        throttle.wait().await;
        throttle.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_once_interval_has_passed() {
        let throttle = Throttle::new(Duration::from_millis(250));
        throttle.wait().await;

        tokio::time::advance(Duration::from_millis(300)).await;

        let before = Instant::now();
        throttle.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_waits() {
        let throttle = Throttle::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..5 {
            throttle.wait().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
