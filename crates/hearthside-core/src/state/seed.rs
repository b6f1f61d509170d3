//! Bootstrap dataset for a fresh session.

use super::{
    AppState, EventLogItem, LogIcon, Memory, Reminder, ReminderIcon, SenderRole, SharedQuote,
    VoiceMessage,
};
use crate::clock::Stamp;

const LEO_VOICE_URL: &str = "media/voice/leo-hello.webm";
const SAM_VOICE_URL: &str = "media/voice/sam-checkin.webm";
const BEACH_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1543269865-cbf427effbad?q=80&w=800&auto=format&fit=crop";

fn reminder(id: &str, title: &str, time: &str, icon: ReminderIcon) -> Reminder {
    Reminder {
        id: id.to_string(),
        title: title.to_string(),
        time: time.to_string(),
        completed: false,
        notified: false,
        icon,
    }
}

fn voice_message(
    id: &str,
    url: &str,
    duration: u32,
    role: SenderRole,
    name: &str,
    at: &str,
) -> VoiceMessage {
    VoiceMessage {
        id: id.to_string(),
        audio_url: url.to_string(),
        duration,
        sender_role: role,
        sender_name: name.to_string(),
        timestamp: at.to_string(),
    }
}

impl AppState {
    /// The fixed sample household used to start a session. Timestamps of the
    /// seeded log entry and quote come from `now`.
    pub fn seed(now: &Stamp) -> Self {
        let timestamp = now.display();
        Self {
            reminders: vec![
                reminder("1", "Take Morning Pills", "08:00", ReminderIcon::Medication),
                reminder("2", "Eat Breakfast", "08:30", ReminderIcon::Meal),
                reminder("3", "Drink a glass of water", "10:00", ReminderIcon::Hydration),
            ],
            alerts: Vec::new(),
            memories: vec![Memory {
                id: "mem1".to_string(),
                image_url: BEACH_PHOTO_URL.to_string(),
                caption: "That wonderful day we spent at the beach with the grandkids. \
                          Remember how much they loved the ice cream?"
                    .to_string(),
                shared_by: "Your Daughter, Jane".to_string(),
            }],
            event_log: vec![EventLogItem {
                id: "ev1".to_string(),
                text: "Caregiver scheduled \"Take Morning Pills\".".to_string(),
                timestamp: timestamp.clone(),
                icon: LogIcon::Task,
            }],
            shared_quote: Some(SharedQuote {
                id: "q1".to_string(),
                text: "Just a little note to say we are thinking of you today!".to_string(),
                timestamp,
            }),
            voice_messages: vec![
                voice_message(
                    "vm1",
                    LEO_VOICE_URL,
                    2,
                    SenderRole::Family,
                    "Your Grandson, Leo",
                    "10:30 AM",
                ),
                voice_message(
                    "vm2",
                    SAM_VOICE_URL,
                    3,
                    SenderRole::Caregiver,
                    "Your Caregiver, Sam",
                    "11:15 AM",
                ),
            ],
        }
    }
}
