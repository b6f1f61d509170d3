//! One-shot audio unlock on the first user gesture.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::AudioAlertService;

/// A user interaction anywhere in the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Click,
    Touch,
}

/// Armed at session start; the first gesture unlocks audio and disarms the
/// gate for good. The session stops listening for gestures once the gate is
/// disarmed.
#[derive(Debug, Clone)]
pub struct UnlockGate {
    armed: bool,
}

impl UnlockGate {
    pub fn new() -> Self {
        Self { armed: true }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Handle a gesture. Returns `true` if this call fired the gate.
    pub fn on_gesture(&mut self, gesture: Gesture, audio: &mut AudioAlertService) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        debug!(?gesture, "first user gesture; unlocking audio");
        audio.unlock();
        true
    }

    /// Disarm without unlocking, for session teardown.
    pub fn cancel(&mut self) {
        self.armed = false;
    }
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, CueEvent, MemoryBackend};
    use crate::storage::AudioConfig;

    fn audio() -> (AudioAlertService, MemoryBackend) {
        let backend = MemoryBackend::new();
        (
            AudioAlertService::new(Box::new(backend.clone()), AudioConfig::default()),
            backend,
        )
    }

    #[test]
    fn first_gesture_unlocks_then_disarms() {
        let (mut audio, backend) = audio();
        let mut gate = UnlockGate::new();

        assert!(gate.on_gesture(Gesture::Touch, &mut audio));
        assert!(audio.is_unlocked());
        assert!(!gate.is_armed());

        let before = backend.events().len();
        assert!(!gate.on_gesture(Gesture::Click, &mut audio));
        assert_eq!(backend.events().len(), before);
    }

    #[test]
    fn cancelled_gate_never_unlocks() {
        let (mut audio, backend) = audio();
        let mut gate = UnlockGate::new();
        gate.cancel();
        assert!(!gate.on_gesture(Gesture::Click, &mut audio));
        assert!(!audio.is_unlocked());
        assert!(!backend.events().contains(&CueEvent::Loaded(Cue::Sos)));
    }
}
