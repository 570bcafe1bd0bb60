// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Sources of the current UTC time, in whole seconds.

use std::sync::atomic::{AtomicI64, Ordering};

/// Provides the current time to the delivery controller.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time as seconds since the Unix epoch.
    fn now_utc_seconds(&self) -> i64;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_utc_seconds: i64) -> Self {
        Self {
            now: AtomicI64::new(now_utc_seconds),
        }
    }

    pub fn set(&self, now_utc_seconds: i64) {
        self.now.store(now_utc_seconds, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_utc_seconds(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_utc_seconds(), 100);
        clock.advance(3600);
        assert_eq!(clock.now_utc_seconds(), 3700);
        clock.set(5);
        assert_eq!(clock.now_utc_seconds(), 5);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_utc_seconds() > 1_577_836_800);
    }
}
