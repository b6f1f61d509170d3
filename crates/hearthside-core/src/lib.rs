//! # Hearthside Core Library
//!
//! Shared household state for a caregiving companion. One [`AppState`] is
//! viewed by the patient, caregiver and family front-ends; all of them read
//! the same snapshot and mutate it only by submitting an [`Action`].
//!
//! ## Architecture
//!
//! - **Store**: holds the current snapshot and applies actions through a pure
//!   reducer ([`state::apply`]); subscribers are notified over a watch channel
//! - **Scheduler**: polls reminder due-times against the wall clock and
//!   fires each reminder at most once
//! - **Audio**: plays the looping SOS cue and the one-shot reminder cue over a
//!   pluggable backend; the `speaker` feature adds output on the default device
//! - **Unlock gate**: arms audio on the first user gesture of a session
//! - **Session**: single-task event loop that serialises all of the above
//!
//! ## Key Components
//!
//! - [`Store`]: snapshot holder and dispatch entry point
//! - [`ReminderScheduler`]: due-reminder detection
//! - [`AudioAlertService`]: sound cues with lazy resource construction
//! - [`Session`]: the cooperative loop tying everything together
//! - [`Config`]: TOML configuration

pub mod audio;
pub mod clock;
pub mod error;
pub mod gate;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;

pub use audio::{AudioAlertService, AudioBackend, Cue, CueHandle, MemoryBackend, TracingBackend};
#[cfg(feature = "speaker")]
pub use audio::SpeakerBackend;
pub use clock::{Clock, ManualClock, Stamp, SystemClock};
pub use error::{AudioError, ConfigError, CoreError};
pub use gate::{Gesture, UnlockGate};
pub use scheduler::{parse_time_of_day, ReminderScheduler};
pub use session::{Session, SessionCommand, SessionHandle};
pub use state::{
    Action, Alert, AlertKind, AppState, EventLogItem, LogIcon, Memory, Reminder, ReminderIcon,
    SenderRole, SharedQuote, VoiceMessage,
};
pub use storage::{AudioOutput, Config};
pub use store::Store;
