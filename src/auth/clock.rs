//! Time source for token expiry

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

/// Source of the current time in milliseconds since the epoch
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;

    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_millis())
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for simulating token expiry
#[derive(Debug)]
pub struct ManualClock {
    millis: Mutex<i64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Mutex::new(start_millis),
        }
    }

    pub fn starting_now() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    pub fn advance(&self, by: Duration) {
        *self.millis.lock() += by.num_milliseconds();
    }

    pub fn set_millis(&self, millis: i64) {
        *self.millis.lock() = millis;
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        *self.millis.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(Duration::seconds(2));
        assert_eq!(clock.now_millis(), 3_000);
        clock.set_millis(10);
        assert_eq!(clock.now().timestamp_millis(), 10);
    }
}
