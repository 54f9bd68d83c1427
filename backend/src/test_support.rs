//! Test utilities shared by unit tests and the integration suites in
//! `tests/`. Compiled for `cfg(test)` or with the `test-support` feature.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock returning a settable instant.
///
/// # Examples
/// ```
/// use ledger::test_support::SteppingClock;
/// use mockable::Clock;
///
/// let clock = SteppingClock::default();
/// let before = clock.utc();
/// clock.advance_seconds(5);
/// assert_eq!((clock.utc() - before).num_seconds(), 5);
/// ```
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Default for SteppingClock {
    /// 2025-03-14T09:26:53Z.
    fn default() -> Self {
        match Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).single() {
            Some(now) => Self::new(now),
            None => panic!("fixture timestamp is unambiguous"),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
