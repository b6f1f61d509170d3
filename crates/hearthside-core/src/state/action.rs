//! The inbound contract: every mutation of [`super::AppState`] is one of
//! these actions.

use serde::{Deserialize, Serialize};

use super::model::{Alert, Memory, Reminder, SharedQuote, VoiceMessage};

/// An action submitted by a front-end or by the scheduler.
///
/// Serialized with a `type` tag, e.g.
/// `{"type":"LOG_EMOTION","emotion":"happy"}`. Unrecognised tags decode to
/// [`Action::Unknown`], which the reducer ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddReminder { reminder: Reminder },
    DeleteReminder { id: String },
    CompleteReminder { id: String },
    MarkReminderNotified { id: String },
    TriggerSos { alert: Alert },
    AcknowledgeAlerts,
    LogEmotion { emotion: String },
    AddMemory { memory: Memory },
    AddQuote { quote: SharedQuote },
    AddVoiceMessage { message: VoiceMessage },
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Wire name of this action
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::AddReminder { .. } => "ADD_REMINDER",
            Action::DeleteReminder { .. } => "DELETE_REMINDER",
            Action::CompleteReminder { .. } => "COMPLETE_REMINDER",
            Action::MarkReminderNotified { .. } => "MARK_REMINDER_NOTIFIED",
            Action::TriggerSos { .. } => "TRIGGER_SOS",
            Action::AcknowledgeAlerts => "ACKNOWLEDGE_ALERTS",
            Action::LogEmotion { .. } => "LOG_EMOTION",
            Action::AddMemory { .. } => "ADD_MEMORY",
            Action::AddQuote { .. } => "ADD_QUOTE",
            Action::AddVoiceMessage { .. } => "ADD_VOICE_MESSAGE",
            Action::Unknown => "UNKNOWN",
        }
    }

    pub fn complete_reminder(id: impl Into<String>) -> Self {
        Action::CompleteReminder { id: id.into() }
    }

    pub fn delete_reminder(id: impl Into<String>) -> Self {
        Action::DeleteReminder { id: id.into() }
    }

    pub fn mark_reminder_notified(id: impl Into<String>) -> Self {
        Action::MarkReminderNotified { id: id.into() }
    }

    pub fn log_emotion(emotion: impl Into<String>) -> Self {
        Action::LogEmotion {
            emotion: emotion.into(),
        }
    }
}
