//! Playback backends.
//!
//! A backend turns a cue's source URL into a [`CueHandle`]. The handle has
//! media-element semantics: it is paused until `play` succeeds, `pause`
//! keeps the position, `rewind` goes back to the start.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::Cue;
use crate::error::AudioError;

pub trait CueHandle: Send {
    /// Start playback from the current position.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn rewind(&mut self);
    fn is_paused(&self) -> bool;
    /// 0.0 ..= 1.0
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, looping: bool);
}

pub trait AudioBackend: Send {
    fn load(&mut self, cue: Cue, source_url: &str) -> Result<Box<dyn CueHandle>, AudioError>;
}

// ── Tracing backend ─────────────────────────────────────────────────

/// Headless backend that reports cue activity through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBackend;

impl AudioBackend for TracingBackend {
    fn load(&mut self, cue: Cue, source_url: &str) -> Result<Box<dyn CueHandle>, AudioError> {
        debug!(?cue, source_url, "loading cue");
        Ok(Box::new(TracingHandle {
            cue,
            paused: true,
            volume: 1.0,
            looping: false,
        }))
    }
}

struct TracingHandle {
    cue: Cue,
    paused: bool,
    volume: f32,
    looping: bool,
}

impl CueHandle for TracingHandle {
    fn play(&mut self) -> Result<(), AudioError> {
        self.paused = false;
        if self.volume > 0.0 {
            info!(cue = ?self.cue, volume = self.volume, looping = self.looping, "playing cue");
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            debug!(cue = ?self.cue, "cue paused");
        }
        self.paused = true;
    }

    fn rewind(&mut self) {
        debug!(cue = ?self.cue, "cue rewound");
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}

// ── Memory backend ──────────────────────────────────────────────────

/// One operation observed by a [`MemoryBackend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueEvent {
    Loaded(Cue),
    Played { cue: Cue, volume: f32 },
    Blocked(Cue),
    Paused(Cue),
    Rewound(Cue),
}

#[derive(Debug, Default)]
struct Shared {
    events: Mutex<Vec<CueEvent>>,
    blocked: AtomicBool,
    fail_loads: AtomicBool,
}

impl Shared {
    fn push(&self, event: CueEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

/// Backend that records every operation. Clones share the same record, so
/// one clone can be handed to the service and another kept for inspection.
///
/// Playback can be blocked to mimic a platform autoplay policy.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    shared: Arc<Shared>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `play` fail with [`AudioError::Blocked`].
    pub fn block_playback(&self, blocked: bool) {
        self.shared.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Make every subsequent `load` fail.
    pub fn fail_loads(&self, fail: bool) {
        self.shared.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<CueEvent> {
        self.shared
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Audible plays of `cue` (volume above zero).
    pub fn plays(&self, cue: Cue) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(e, CueEvent::Played { cue: c, volume } if *c == cue && *volume > 0.0)
            })
            .count()
    }

    pub fn loads(&self, cue: Cue) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == CueEvent::Loaded(cue))
            .count()
    }
}

impl AudioBackend for MemoryBackend {
    fn load(&mut self, cue: Cue, source_url: &str) -> Result<Box<dyn CueHandle>, AudioError> {
        if self.shared.fail_loads.load(Ordering::SeqCst) {
            return Err(AudioError::LoadFailed {
                cue,
                source_url: source_url.to_string(),
                message: "resource unavailable".to_string(),
            });
        }
        self.shared.push(CueEvent::Loaded(cue));
        Ok(Box::new(MemoryHandle {
            cue,
            shared: Arc::clone(&self.shared),
            paused: true,
            volume: 1.0,
        }))
    }
}

struct MemoryHandle {
    cue: Cue,
    shared: Arc<Shared>,
    paused: bool,
    volume: f32,
}

impl CueHandle for MemoryHandle {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.shared.blocked.load(Ordering::SeqCst) {
            self.shared.push(CueEvent::Blocked(self.cue));
            return Err(AudioError::Blocked(self.cue));
        }
        self.paused = false;
        self.shared.push(CueEvent::Played {
            cue: self.cue,
            volume: self.volume,
        });
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        self.shared.push(CueEvent::Paused(self.cue));
    }

    fn rewind(&mut self) {
        self.shared.push(CueEvent::Rewound(self.cue));
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_looping(&mut self, _looping: bool) {}
}
