//! Wall-clock sources.

use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use std::cell::Cell;

/// Source of the current time.
pub trait Clock {
    /// Current local wall-clock time.
    fn local_now(&self) -> NaiveDateTime;
    /// Current instant in UTC, used for record timestamps.
    fn utc_now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn local_now(&self) -> NaiveDateTime {
        (**self).local_now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        (**self).utc_now()
    }
}

/// Host clock in the process-local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock whose local zone is UTC.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn local_now(&self) -> NaiveDateTime {
        self.now.get()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.now.get().and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use chrono::{Duration, NaiveDate};

    #[test]
    fn manual_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::hours(2));

        assert_eq!(clock.local_now(), start + Duration::hours(2));
        assert_eq!(clock.utc_now().naive_utc(), start + Duration::hours(2));
    }
}
