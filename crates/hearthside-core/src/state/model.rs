//! Entity types that make up [`super::AppState`].
//!
//! Field names serialize in camelCase and enum tags in SCREAMING_CASE so a
//! snapshot reads the same to every front-end.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn local_timestamp() -> String {
    Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Icon shown next to a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderIcon {
    Medication,
    Meal,
    Hydration,
    Activity,
    Appointment,
    Other,
}

/// Icon shown next to an audit-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogIcon {
    Task,
    Reminder,
    Sos,
    Fall,
    Memory,
    Emotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    Sos,
    Fall,
    Emotion,
}

impl AlertKind {
    /// SOS and FALL alerts stay pending until a caregiver acknowledges them.
    pub fn needs_acknowledgement(self) -> bool {
        matches!(self, AlertKind::Sos | AlertKind::Fall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SenderRole {
    Caregiver,
    Family,
    Patient,
}

/// A task with a daily due time.
///
/// `completed` is set once by the patient, `notified` once by the scheduler.
/// Neither is ever reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    /// 24-hour `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notified: bool,
    pub icon: ReminderIcon,
}

impl Reminder {
    pub fn new(title: impl Into<String>, time: impl Into<String>, icon: ReminderIcon) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            time: time.into(),
            completed: false,
            notified: false,
            icon,
        }
    }

    /// Still waiting for either completion or its due notification.
    pub fn is_pending(&self) -> bool {
        !self.completed && !self.notified
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    #[serde(default)]
    pub requires_acknowledgement: bool,
    /// Detected emotion label; only present on EMOTION alerts raised by
    /// emotion detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
}

impl Alert {
    /// A new alert. The store replaces `id` and `timestamp` when it applies
    /// the action and decides `requires_acknowledgement` from the kind.
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            timestamp: local_timestamp(),
            kind,
            message: message.into(),
            requires_acknowledgement: false,
            emotion: None,
        }
    }

    pub fn sos() -> Self {
        Self::new(AlertKind::Sos, "Patient pressed the SOS button.")
    }

    pub fn fall() -> Self {
        Self::new(AlertKind::Fall, "A potential fall was detected.")
    }

    pub fn is_pending(&self) -> bool {
        self.kind.needs_acknowledgement() && self.requires_acknowledgement
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    /// Opaque media reference.
    pub image_url: String,
    pub caption: String,
    pub shared_by: String,
}

impl Memory {
    pub fn new(
        image_url: impl Into<String>,
        caption: impl Into<String>,
        shared_by: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            image_url: image_url.into(),
            caption: caption.into(),
            shared_by: shared_by.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLogItem {
    pub id: String,
    pub text: String,
    pub timestamp: String,
    pub icon: LogIcon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedQuote {
    pub id: String,
    pub text: String,
    pub timestamp: String,
}

impl SharedQuote {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            timestamp: local_timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceMessage {
    pub id: String,
    /// Opaque media reference.
    pub audio_url: String,
    /// Seconds.
    pub duration: u32,
    pub sender_role: SenderRole,
    pub sender_name: String,
    pub timestamp: String,
}

impl VoiceMessage {
    pub fn new(
        audio_url: impl Into<String>,
        duration: u32,
        sender_role: SenderRole,
        sender_name: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            audio_url: audio_url.into(),
            duration,
            sender_role,
            sender_name: sender_name.into(),
            timestamp: Local::now().format("%-I:%M %p").to_string(),
        }
    }
}
