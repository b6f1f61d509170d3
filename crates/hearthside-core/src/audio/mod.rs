//! Audible alert cues.
//!
//! [`AudioAlertService`] owns one handle per cue. Each handle is built on
//! first use and reused for the rest of the process. Playback failures are
//! logged and swallowed here; nothing above this module ever sees them.

mod backend;
#[cfg(feature = "speaker")]
mod speaker;

pub use backend::{AudioBackend, CueEvent, CueHandle, MemoryBackend, TracingBackend};
#[cfg(feature = "speaker")]
pub use speaker::SpeakerBackend;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::storage::AudioConfig;

/// The two sounds the core knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Looping alarm for SOS and falls.
    Sos,
    /// One-shot chime for a due reminder.
    Reminder,
}

pub struct AudioAlertService {
    backend: Box<dyn AudioBackend>,
    settings: AudioConfig,
    sos: Option<Box<dyn CueHandle>>,
    reminder: Option<Box<dyn CueHandle>>,
    unlocked: bool,
}

impl AudioAlertService {
    pub fn new(backend: Box<dyn AudioBackend>, settings: AudioConfig) -> Self {
        Self {
            backend,
            settings,
            sos: None,
            reminder: None,
            unlocked: false,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn is_sos_playing(&self) -> bool {
        self.sos.as_ref().is_some_and(|h| !h.is_paused())
    }

    /// Arm playback from inside a user-gesture handler.
    ///
    /// Plays and immediately stops the SOS cue at zero volume. Returns
    /// whether audio is unlocked afterwards; on failure the service stays
    /// locked so a later gesture can retry.
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return true;
        }
        let volume = self.volume();
        let Some(handle) = self.handle(Cue::Sos) else {
            return false;
        };
        if !handle.is_paused() {
            // The alarm is already sounding, so playback is evidently allowed.
            self.unlocked = true;
            return true;
        }

        handle.set_volume(0.0);
        let result = handle.play();
        handle.pause();
        handle.rewind();
        handle.set_volume(volume);

        match result {
            Ok(()) => {
                self.unlocked = true;
                info!("audio playback unlocked");
                true
            }
            Err(e) => {
                warn!(error = %e, "audio unlock failed; will retry on next interaction");
                false
            }
        }
    }

    /// Start the looping SOS alarm. No-op while it is already playing.
    pub fn play_sos_alert(&mut self) {
        let Some(handle) = self.handle(Cue::Sos) else {
            return;
        };
        if !handle.is_paused() {
            return;
        }
        if let Err(e) = handle.play() {
            warn!(error = %e, "error playing SOS sound");
        }
    }

    /// Stop and rewind the SOS alarm if it is playing.
    pub fn stop_sos_alert(&mut self) {
        if let Some(handle) = self.sos.as_mut() {
            if !handle.is_paused() {
                handle.pause();
                handle.rewind();
            }
        }
    }

    /// Play the reminder chime from the start, cutting off any chime still
    /// sounding.
    pub fn play_reminder_alert(&mut self) {
        let Some(handle) = self.handle(Cue::Reminder) else {
            return;
        };
        handle.rewind();
        if let Err(e) = handle.play() {
            warn!(error = %e, "error playing reminder sound");
        }
    }

    fn volume(&self) -> f32 {
        self.settings.volume.min(100) as f32 / 100.0
    }

    /// The cue's handle, constructing it on first use. `None` when audio is
    /// disabled or the resource could not be loaded.
    fn handle(&mut self, cue: Cue) -> Option<&mut Box<dyn CueHandle>> {
        if !self.settings.enabled {
            return None;
        }
        let volume = self.volume();
        let (slot, source_url) = match cue {
            Cue::Sos => (&mut self.sos, &self.settings.sos_alert_url),
            Cue::Reminder => (&mut self.reminder, &self.settings.reminder_alert_url),
        };

        if slot.is_none() {
            match self.backend.load(cue, source_url) {
                Ok(mut handle) => {
                    handle.set_looping(cue == Cue::Sos);
                    handle.set_volume(volume);
                    *slot = Some(handle);
                }
                Err(e) => {
                    warn!(error = %e, ?cue, "failed to load cue");
                    return None;
                }
            }
        }
        slot.as_mut()
    }
}
