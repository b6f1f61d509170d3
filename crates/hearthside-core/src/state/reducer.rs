//! The transition function.
//!
//! `apply` never touches the clock or any other global: the [`Stamp`] for
//! the transition is taken by the store and handed in, so the same inputs
//! always produce the same output.

use super::{Action, Alert, AlertKind, AppState, EventLogItem, LogIcon};
use crate::clock::Stamp;

/// Map `(state, action)` to the next state.
///
/// Total: actions naming a missing entity, and unknown actions, return an
/// unchanged copy of `state`. Reminders, memories and voice messages whose id
/// is already present are ignored; alerts always get a fresh `alert-{seq}` id.
pub fn apply(state: &AppState, action: &Action, stamp: &Stamp) -> AppState {
    match action {
        Action::AddReminder { reminder } => {
            if state.reminder(&reminder.id).is_some() {
                return state.clone();
            }
            let mut next = state.clone();
            next.reminders.push(reminder.clone());
            record(
                &mut next,
                stamp,
                LogIcon::Task,
                format!("Caregiver scheduled \"{}\".", reminder.title),
            );
            next
        }

        Action::DeleteReminder { id } => {
            let mut next = state.clone();
            next.reminders.retain(|r| &r.id != id);
            next
        }

        Action::CompleteReminder { id } => {
            let Some(title) = state.reminder(id).map(|r| r.title.clone()) else {
                return state.clone();
            };
            let mut next = state.clone();
            for reminder in next.reminders.iter_mut().filter(|r| &r.id == id) {
                reminder.completed = true;
            }
            record(
                &mut next,
                stamp,
                LogIcon::Reminder,
                format!("Patient marked \"{title}\" as complete."),
            );
            next
        }

        Action::MarkReminderNotified { id } => {
            let mut next = state.clone();
            for reminder in next.reminders.iter_mut().filter(|r| &r.id == id) {
                reminder.notified = true;
            }
            next
        }

        Action::TriggerSos { alert } => {
            let mut alert = alert.clone();
            alert.id = format!("alert-{}", stamp.seq);
            alert.timestamp = stamp.display();
            alert.requires_acknowledgement = alert.kind.needs_acknowledgement();

            let entry = match alert.kind {
                AlertKind::Fall => Some((LogIcon::Fall, "Potential fall detected!")),
                AlertKind::Sos => Some((LogIcon::Sos, "Patient triggered an SOS alert!")),
                AlertKind::Emotion => None,
            };

            let mut next = state.clone();
            next.alerts.insert(0, alert);
            if let Some((icon, text)) = entry {
                record(&mut next, stamp, icon, text.to_string());
            }
            next
        }

        Action::AcknowledgeAlerts => {
            let mut next = state.clone();
            for alert in next
                .alerts
                .iter_mut()
                .filter(|a| a.kind.needs_acknowledgement())
            {
                alert.requires_acknowledgement = false;
            }
            next
        }

        Action::LogEmotion { emotion } => {
            if is_repeat_emotion(state, emotion) {
                return state.clone();
            }
            let alert = Alert {
                id: format!("alert-{}", stamp.seq),
                timestamp: stamp.display(),
                kind: AlertKind::Emotion,
                message: format!("Patient may be feeling: {emotion}"),
                requires_acknowledgement: false,
                emotion: Some(emotion.clone()),
            };
            let mut next = state.clone();
            next.alerts.insert(0, alert);
            record(
                &mut next,
                stamp,
                LogIcon::Emotion,
                format!("AI companion detected emotion: {emotion}."),
            );
            next
        }

        Action::AddMemory { memory } => {
            if state.memories.iter().any(|m| m.id == memory.id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.memories.insert(0, memory.clone());
            record(
                &mut next,
                stamp,
                LogIcon::Memory,
                format!("{} shared a new memory.", memory.shared_by),
            );
            next
        }

        Action::AddQuote { quote } => {
            let mut quote = quote.clone();
            quote.timestamp = stamp.display();
            AppState {
                shared_quote: Some(quote),
                ..state.clone()
            }
        }

        Action::AddVoiceMessage { message } => {
            if state.voice_messages.iter().any(|m| m.id == message.id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.voice_messages.insert(0, message.clone());
            next
        }

        Action::Unknown => state.clone(),
    }
}

/// The newest alert is already an EMOTION alert for the same label.
fn is_repeat_emotion(state: &AppState, emotion: &str) -> bool {
    state.latest_alert().is_some_and(|latest| {
        latest.kind == AlertKind::Emotion && latest.emotion.as_deref() == Some(emotion)
    })
}

fn record(state: &mut AppState, stamp: &Stamp, icon: LogIcon, text: String) {
    state.event_log.insert(
        0,
        EventLogItem {
            id: format!("log-{}", stamp.seq),
            text,
            timestamp: stamp.display(),
            icon,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Memory, Reminder, ReminderIcon, SenderRole, SharedQuote, VoiceMessage};
    use chrono::NaiveDate;

    fn stamp(seq: u64) -> Stamp {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, seq as u32 % 60)
            .unwrap();
        Stamp::new(seq, at)
    }

    fn seeded() -> AppState {
        AppState::seed(&stamp(0))
    }

    fn walk() -> Reminder {
        Reminder {
            id: "walk".to_string(),
            title: "Walk".to_string(),
            time: "09:00".to_string(),
            completed: false,
            notified: false,
            icon: ReminderIcon::Activity,
        }
    }

    #[test]
    fn unknown_action_is_noop() {
        let state = seeded();
        assert_eq!(apply(&state, &Action::Unknown, &stamp(1)), state);
    }

    #[test]
    fn add_reminder_appends_and_logs() {
        let next = apply(&seeded(), &Action::AddReminder { reminder: walk() }, &stamp(1));
        assert_eq!(next.reminders.len(), 4);
        assert_eq!(next.reminders[3].id, "walk");
        assert_eq!(next.event_log.len(), 2);
        assert_eq!(next.event_log[0].text, "Caregiver scheduled \"Walk\".");
        assert_eq!(next.event_log[0].icon, LogIcon::Task);
        assert_eq!(next.event_log[0].id, "log-1");
    }

    #[test]
    fn add_reminder_with_existing_id_is_ignored() {
        let state = seeded();
        let mut dup = walk();
        dup.id = "1".to_string();
        assert_eq!(apply(&state, &Action::AddReminder { reminder: dup }, &stamp(1)), state);
    }

    #[test]
    fn delete_reminder_removes_without_logging() {
        let next = apply(&seeded(), &Action::delete_reminder("2"), &stamp(1));
        assert_eq!(next.reminders.len(), 2);
        assert!(next.reminder("2").is_none());
        assert_eq!(next.event_log.len(), 1);

        let state = seeded();
        assert_eq!(apply(&state, &Action::delete_reminder("missing"), &stamp(2)), state);
    }

    #[test]
    fn complete_reminder_sets_flag_and_logs() {
        let next = apply(&seeded(), &Action::complete_reminder("1"), &stamp(1));
        assert!(next.reminder("1").unwrap().completed);
        assert_eq!(
            next.event_log[0].text,
            "Patient marked \"Take Morning Pills\" as complete."
        );
        assert_eq!(next.event_log[0].icon, LogIcon::Reminder);
    }

    #[test]
    fn complete_missing_reminder_is_noop() {
        let state = seeded();
        assert_eq!(apply(&state, &Action::complete_reminder("nope"), &stamp(1)), state);
    }

    #[test]
    fn completing_twice_logs_twice() {
        let once = apply(&seeded(), &Action::complete_reminder("1"), &stamp(1));
        let twice = apply(&once, &Action::complete_reminder("1"), &stamp(2));
        assert!(twice.reminder("1").unwrap().completed);
        assert_eq!(twice.event_log.len(), 3);
        assert_eq!(twice.event_log[0].id, "log-2");
        assert_eq!(
            twice.event_log[0].text,
            "Patient marked \"Take Morning Pills\" as complete."
        );
    }

    #[test]
    fn mark_notified_does_not_log() {
        let next = apply(&seeded(), &Action::mark_reminder_notified("3"), &stamp(1));
        assert!(next.reminder("3").unwrap().notified);
        assert!(!next.reminder("3").unwrap().completed);
        assert_eq!(next.event_log.len(), 1);
    }

    #[test]
    fn fall_requires_acknowledgement_until_acknowledged() {
        let fall = apply(&seeded(), &Action::TriggerSos { alert: Alert::fall() }, &stamp(1));
        assert!(fall.alerts[0].requires_acknowledgement);
        assert_eq!(fall.event_log[0].text, "Potential fall detected!");
        assert_eq!(fall.event_log[0].icon, LogIcon::Fall);
        assert!(fall.has_unacknowledged_alerts());

        let acked = apply(&fall, &Action::AcknowledgeAlerts, &stamp(2));
        assert!(!acked.alerts[0].requires_acknowledgement);
        assert_eq!(acked.event_log, fall.event_log);
        assert!(!acked.has_unacknowledged_alerts());
    }

    #[test]
    fn sos_logs_and_restamps() {
        let next = apply(&seeded(), &Action::TriggerSos { alert: Alert::sos() }, &stamp(7));
        assert_eq!(next.event_log[0].text, "Patient triggered an SOS alert!");
        assert_eq!(next.alerts[0].timestamp, stamp(7).display());
    }

    #[test]
    fn repeated_sos_with_same_alert_is_kept() {
        let alert = Alert::sos();
        let state = apply(&seeded(), &Action::TriggerSos { alert: alert.clone() }, &stamp(1));
        let state = apply(&state, &Action::AcknowledgeAlerts, &stamp(2));
        let state = apply(&state, &Action::TriggerSos { alert }, &stamp(3));

        assert_eq!(state.alerts.len(), 2);
        assert_eq!(state.alerts[0].id, "alert-3");
        assert_eq!(state.alerts[1].id, "alert-1");
        assert!(state.has_unacknowledged_alerts());
        assert_eq!(state.event_log.len(), 3);
        assert_eq!(state.event_log[0].text, "Patient triggered an SOS alert!");
    }

    #[test]
    fn alert_ids_never_collide_with_emotion_ids() {
        let mut alert = Alert::fall();
        alert.id = "alert-2".to_string();
        let state = apply(&seeded(), &Action::TriggerSos { alert }, &stamp(1));
        let state = apply(&state, &Action::log_emotion("calm"), &stamp(2));
        assert_eq!(state.alerts[0].id, "alert-2");
        assert_eq!(state.alerts[1].id, "alert-1");
    }

    #[test]
    fn emotion_through_trigger_sos_is_not_logged_or_pending() {
        let mut alert = Alert::new(AlertKind::Emotion, "Patient may be feeling: calm");
        alert.requires_acknowledgement = true;
        let next = apply(&seeded(), &Action::TriggerSos { alert }, &stamp(1));
        assert_eq!(next.alerts.len(), 1);
        assert!(!next.alerts[0].requires_acknowledgement);
        assert_eq!(next.event_log.len(), 1);
    }

    #[test]
    fn acknowledge_leaves_emotion_alerts_alone() {
        let state = apply(&seeded(), &Action::TriggerSos { alert: Alert::sos() }, &stamp(1));
        let state = apply(&state, &Action::log_emotion("sad"), &stamp(2));
        let acked = apply(&state, &Action::AcknowledgeAlerts, &stamp(3));
        assert_eq!(acked.alerts[0], state.alerts[0]);
        assert!(acked.alerts.iter().all(|a| !a.requires_acknowledgement));
    }

    #[test]
    fn repeated_emotion_is_deduplicated() {
        let once = apply(&seeded(), &Action::log_emotion("happy"), &stamp(1));
        let twice = apply(&once, &Action::log_emotion("happy"), &stamp(2));
        assert_eq!(twice, once);
        assert_eq!(twice.alerts.len(), 1);
        assert_eq!(twice.alerts[0].message, "Patient may be feeling: happy");
        assert_eq!(twice.event_log[0].text, "AI companion detected emotion: happy.");

        let other = apply(&twice, &Action::log_emotion("sad"), &stamp(3));
        assert_eq!(other.alerts.len(), 2);
        assert_eq!(other.alerts[0].id, "alert-3");
    }

    #[test]
    fn emotion_repeats_after_intervening_alert() {
        let state = apply(&seeded(), &Action::log_emotion("happy"), &stamp(1));
        let state = apply(&state, &Action::TriggerSos { alert: Alert::sos() }, &stamp(2));
        let state = apply(&state, &Action::log_emotion("happy"), &stamp(3));
        assert_eq!(state.alerts.len(), 3);
    }

    #[test]
    fn memory_is_prepended_and_logged() {
        let memory = Memory::new("media/photo.jpg", "Picnic", "Your Son, Tom");
        let next = apply(&seeded(), &Action::AddMemory { memory }, &stamp(1));
        assert_eq!(next.memories.len(), 2);
        assert_eq!(next.memories[0].caption, "Picnic");
        assert_eq!(next.event_log[0].text, "Your Son, Tom shared a new memory.");
    }

    #[test]
    fn quote_is_replaced_without_logging() {
        let quote = SharedQuote::new("Have a lovely afternoon!");
        let next = apply(&seeded(), &Action::AddQuote { quote: quote.clone() }, &stamp(4));
        let stored = next.shared_quote.as_ref().unwrap();
        assert_eq!(stored.id, quote.id);
        assert_eq!(stored.timestamp, stamp(4).display());
        assert_eq!(next.event_log.len(), 1);
    }

    #[test]
    fn voice_message_is_prepended_without_logging() {
        let message = VoiceMessage::new("media/voice/new.webm", 4, SenderRole::Patient, "Grandma");
        let next = apply(&seeded(), &Action::AddVoiceMessage { message }, &stamp(1));
        assert_eq!(next.voice_messages.len(), 3);
        assert_eq!(next.voice_messages[0].sender_name, "Grandma");
        assert_eq!(next.event_log.len(), 1);
    }
}
