//! The shared household state and its transition function.

mod action;
mod model;
mod reducer;
mod seed;

pub use action::Action;
pub use model::{
    Alert, AlertKind, EventLogItem, LogIcon, Memory, Reminder, ReminderIcon, SenderRole,
    SharedQuote, VoiceMessage,
};
pub use reducer::apply;

use serde::{Deserialize, Serialize};

/// The single aggregate every view reads.
///
/// `alerts`, `memories`, `event_log` and `voice_messages` are newest-first;
/// `reminders` keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub reminders: Vec<Reminder>,
    pub alerts: Vec<Alert>,
    pub memories: Vec<Memory>,
    pub event_log: Vec<EventLogItem>,
    pub shared_quote: Option<SharedQuote>,
    pub voice_messages: Vec<VoiceMessage>,
}

impl AppState {
    pub fn reminder(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// Reminders that are neither completed nor notified.
    pub fn pending_reminders(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter().filter(|r| r.is_pending())
    }

    pub fn latest_alert(&self) -> Option<&Alert> {
        self.alerts.first()
    }

    /// SOS/FALL alerts a caregiver has not yet acknowledged.
    pub fn unacknowledged_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.is_pending())
    }

    pub fn has_unacknowledged_alerts(&self) -> bool {
        self.unacknowledged_alerts().next().is_some()
    }

    pub fn latest_log_entry(&self) -> Option<&EventLogItem> {
        self.event_log.first()
    }
}
