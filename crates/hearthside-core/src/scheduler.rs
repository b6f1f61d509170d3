//! Reminder due-detection.
//!
//! The reducer never looks at the time of day. The scheduler is polled on a
//! fixed period; on each tick it compares every pending reminder's `HH:MM`
//! against the local time of day and, for each one at or past due, plays
//! the reminder cue and dispatches `MARK_REMINDER_NOTIFIED`.
//!
//! A reminder whose time already passed when the session started fires on
//! the first tick. `notified` never resets, so each reminder fires at most
//! once. A reminder whose time cannot be parsed is never due; it is reported
//! once per scheduler rather than on every poll.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use tracing::{info, warn};

use crate::audio::AudioAlertService;
use crate::state::{Action, AppState, Reminder};
use crate::store::Store;

/// Parse `H:MM` / `HH:MM` (24-hour) into minutes since midnight.
pub fn parse_time_of_day(time: &str) -> Option<u32> {
    let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    Some(parsed.hour() * 60 + parsed.minute())
}

#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    period: Duration,
    malformed: BTreeSet<String>,
}

impl ReminderScheduler {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(30);

    pub fn new(period: Duration) -> Self {
        Self {
            period,
            malformed: BTreeSet::new(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ids of reminders skipped so far because their time is malformed.
    pub fn malformed(&self) -> impl Iterator<Item = &str> {
        self.malformed.iter().map(String::as_str)
    }

    /// Pending reminders due at or before `minutes_of_day`.
    ///
    /// Reminders with an unparseable time are skipped.
    pub fn due_reminders(state: &AppState, minutes_of_day: u32) -> Vec<&Reminder> {
        state
            .pending_reminders()
            .filter(|reminder| {
                parse_time_of_day(&reminder.time).is_some_and(|due| due <= minutes_of_day)
            })
            .collect()
    }

    /// One poll. Returns how many reminders fired.
    pub fn tick(&mut self, store: &mut Store, audio: &mut AudioAlertService) -> usize {
        let now = store.clock().minutes_of_day();
        let state = store.state();
        self.report_malformed(&state);
        let due = Self::due_reminders(&state, now);

        for reminder in &due {
            info!(reminder = %reminder.id, title = %reminder.title, "reminder due");
            audio.play_reminder_alert();
            store.dispatch(Action::mark_reminder_notified(reminder.id.clone()));
        }
        due.len()
    }

    fn report_malformed(&mut self, state: &AppState) {
        for reminder in state.pending_reminders() {
            if parse_time_of_day(&reminder.time).is_none()
                && self.malformed.insert(reminder.id.clone())
            {
                warn!(
                    reminder = %reminder.id,
                    time = %reminder.time,
                    "skipping reminder with malformed time"
                );
            }
        }
    }
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}
