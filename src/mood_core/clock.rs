//! Injectable source of "now" and the local timezone.
//!
//! Every day-boundary decision goes through a [`Clock`] so tests can pin
//! today to a fixed instant and offset.

use chrono::{DateTime, Duration, FixedOffset, Local, TimeZone};
use std::sync::Mutex;

/// Provides the current instant in the user's local timezone.
pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;

    fn timezone(&self) -> Self::Tz {
        self.now().timezone()
    }

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Device clock and local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, FixedOffset, TimeZone};
/// use moodyday::mood_core::{Clock, FixedClock};
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// let clock = FixedClock::new(tz.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
/// clock.advance(Duration::hours(25));
/// assert_eq!(clock.now().to_rfc3339(), "2024-03-02T10:00:00+00:00");
/// ```
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    type Tz = FixedOffset;

    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    type Tz = C::Tz;

    fn now(&self) -> DateTime<Self::Tz> {
        (**self).now()
    }
}
