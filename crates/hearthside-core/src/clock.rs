//! Wall-clock access.
//!
//! The store stamps every transition and the scheduler compares reminder
//! times against the local time of day. Both read time through [`Clock`] so
//! tests can pin it.

use std::sync::Mutex;

use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Minutes since local midnight.
    fn minutes_of_day(&self) -> u32 {
        let now = self.now();
        now.hour() * 60 + now.minute()
    }
}

/// Host clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock pinned to `hour:minute` on today's date.
    pub fn at(hour: u32, minute: u32) -> Self {
        let today = Local::now().date_naive();
        let now = today
            .and_hms_opt(hour, minute, 0)
            .unwrap_or_else(|| today.and_time(NaiveTime::default()));
        Self::new(now)
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Move to `hour:minute` keeping the current date.
    pub fn set_time(&self, hour: u32, minute: u32) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            *guard = guard.date().and_time(time);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Identity of one applied transition: a monotonic sequence number and the
/// instant the store accepted the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub seq: u64,
    pub at: NaiveDateTime,
}

impl Stamp {
    pub fn new(seq: u64, at: NaiveDateTime) -> Self {
        Self { seq, at }
    }

    /// Human-readable local timestamp, e.g. `10/19/2026, 8:05:00 AM`.
    pub fn display(&self) -> String {
        self.at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    }
}
