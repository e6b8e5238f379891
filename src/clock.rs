//! Wall-clock access for timestamps and the "today" boundary.

use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, SubsecRound, Utc};

/// Persisted format of the viewed-prayers day, e.g. `Mon Oct 19 2026`.
const DAY_FORMAT: &str = "%a %b %d %Y";

/// Source of the current instant and calendar day.
pub trait Clock: Send + Sync {
    /// Current instant, truncated to milliseconds.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time; `today` follows the local calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock for tests and previews. `today` is the UTC date of `now`.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now.trunc_subsecs(3)),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now.trunc_subsecs(3);
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Format a day the way the viewed-date key stores it.
pub fn day_string(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
