//! # Clock Oracle
//!
//! Elections never schedule anything. Deadlines are plain data and every
//! deadline-sensitive operation reads the clock exactly once when it starts.
//! The [`Clock`] trait is that single read.
//!
//! - [`SystemClock`] reads the wall clock.
//! - [`ManualClock`] is driven explicitly: tests and the CLI's `--at`
//!   override use it to replay an election at chosen instants. It never
//!   moves backwards.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current time.
pub trait Clock {
    /// Current time. Successive calls never go backwards.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall-clock time via `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Starts the clock at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Starts the clock at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Moves the clock forward by `secs` seconds.
    pub fn advance(&self, secs: u64) {
        let mut current = self.current.lock();
        let step = Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX));
        *current = current.checked_add_signed(step).unwrap_or(*current);
    }

    /// Jumps to `instant`. Instants earlier than the current reading are
    /// ignored, keeping the clock monotonic.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut current = self.current.lock();
        if instant > *current {
            *current = instant;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(60);
        assert_eq!(clock.now(), start + Duration::seconds(60));
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.set(start - Duration::hours(1));
        assert_eq!(clock.now(), start);
        clock.set(start + Duration::hours(1));
        assert_eq!(clock.now(), start + Duration::hours(1));
    }

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn shared_clock_reads_through() {
        let clock = Arc::new(ManualClock::starting_now());
        let view = Arc::clone(&clock);
        clock.advance(5);
        assert_eq!(view.now(), clock.now());
    }
}
