//! Playback on the default output device.
//!
//! The output stream cannot leave the thread that opened it, so one audio
//! thread owns the stream, fetches cue sources and drives a `rodio::Sink`
//! per cue. Handles only post requests to that thread and never block.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::backend::{AudioBackend, CueHandle};
use super::Cue;
use crate::error::AudioError;

enum Request {
    Load { cue: Cue, source_url: String },
    Play(Cue),
    Pause(Cue),
    Rewind(Cue),
    Volume(Cue, f32),
    Looping(Cue, bool),
}

/// Backend that plays cues through the system's default output device.
pub struct SpeakerBackend {
    requests: mpsc::Sender<Request>,
}

impl SpeakerBackend {
    /// Open the default output device on a dedicated audio thread.
    ///
    /// # Errors
    /// Returns [`AudioError::DeviceUnavailable`] when no device can be opened.
    pub fn open() -> Result<Self, AudioError> {
        let (requests, inbox) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        thread::Builder::new()
            .name("hearthside-audio".to_string())
            .spawn(move || {
                let (_stream, output) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                Player::new(output).run(inbox);
            })
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?
            .map_err(AudioError::DeviceUnavailable)?;
        Ok(Self { requests })
    }
}

impl AudioBackend for SpeakerBackend {
    fn load(&mut self, cue: Cue, source_url: &str) -> Result<Box<dyn CueHandle>, AudioError> {
        self.requests
            .send(Request::Load {
                cue,
                source_url: source_url.to_string(),
            })
            .map_err(|_| AudioError::LoadFailed {
                cue,
                source_url: source_url.to_string(),
                message: "audio thread stopped".to_string(),
            })?;
        Ok(Box::new(SpeakerHandle {
            cue,
            requests: self.requests.clone(),
            paused: true,
        }))
    }
}

struct SpeakerHandle {
    cue: Cue,
    requests: mpsc::Sender<Request>,
    paused: bool,
}

impl SpeakerHandle {
    fn post(&self, request: Request) {
        if self.requests.send(request).is_err() {
            debug!(cue = ?self.cue, "audio thread gone; request dropped");
        }
    }
}

impl CueHandle for SpeakerHandle {
    fn play(&mut self) -> Result<(), AudioError> {
        self.requests
            .send(Request::Play(self.cue))
            .map_err(|_| AudioError::PlaybackFailed {
                cue: self.cue,
                message: "audio thread stopped".to_string(),
            })?;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        self.post(Request::Pause(self.cue));
    }

    fn rewind(&mut self) {
        self.post(Request::Rewind(self.cue));
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.post(Request::Volume(self.cue, volume));
    }

    fn set_looping(&mut self, looping: bool) {
        self.post(Request::Looping(self.cue, looping));
    }
}

// ── Audio thread ────────────────────────────────────────────────────

struct Track {
    source_url: String,
    bytes: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    paused: bool,
    volume: f32,
    looping: bool,
}

struct Player {
    output: OutputStreamHandle,
    tracks: HashMap<Cue, Track>,
}

impl Player {
    fn new(output: OutputStreamHandle) -> Self {
        Self {
            output,
            tracks: HashMap::new(),
        }
    }

    /// Serve requests until every sender is dropped.
    fn run(mut self, inbox: mpsc::Receiver<Request>) {
        for request in inbox {
            self.handle(request);
        }
        debug!("audio thread stopped");
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Load { cue, source_url } => {
                let bytes = fetch(cue, &source_url)
                    .map_err(|e| warn!(error = %e, ?cue, "failed to fetch cue"))
                    .ok();
                self.tracks.insert(
                    cue,
                    Track {
                        source_url,
                        bytes,
                        sink: None,
                        paused: true,
                        volume: 1.0,
                        looping: false,
                    },
                );
            }
            Request::Play(cue) => {
                if let Some(track) = self.tracks.get_mut(&cue) {
                    track.paused = false;
                    if let Err(e) = track.resume_or_start(cue, &self.output) {
                        warn!(error = %e, ?cue, "cue playback failed");
                    }
                }
            }
            Request::Pause(cue) => {
                if let Some(track) = self.tracks.get_mut(&cue) {
                    track.paused = true;
                    if let Some(sink) = &track.sink {
                        sink.pause();
                    }
                }
            }
            Request::Rewind(cue) => {
                if let Some(track) = self.tracks.get_mut(&cue) {
                    if let Some(sink) = track.sink.take() {
                        sink.stop();
                    }
                    if !track.paused {
                        if let Err(e) = track.resume_or_start(cue, &self.output) {
                            warn!(error = %e, ?cue, "cue playback failed");
                        }
                    }
                }
            }
            Request::Volume(cue, volume) => {
                if let Some(track) = self.tracks.get_mut(&cue) {
                    track.volume = volume;
                    if let Some(sink) = &track.sink {
                        sink.set_volume(volume);
                    }
                }
            }
            Request::Looping(cue, looping) => {
                if let Some(track) = self.tracks.get_mut(&cue) {
                    track.looping = looping;
                }
            }
        }
    }
}

impl Track {
    /// Resume a paused sink, or start the cue from the beginning.
    fn resume_or_start(&mut self, cue: Cue, output: &OutputStreamHandle) -> Result<(), AudioError> {
        if let Some(sink) = &self.sink {
            if !sink.empty() {
                sink.play();
                return Ok(());
            }
        }

        let bytes = match &self.bytes {
            Some(bytes) => Arc::clone(bytes),
            None => {
                let bytes = fetch(cue, &self.source_url)?;
                self.bytes = Some(Arc::clone(&bytes));
                bytes
            }
        };
        let failed = |message: String| AudioError::PlaybackFailed { cue, message };

        let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| failed(e.to_string()))?;
        let sink = Sink::try_new(output).map_err(|e| failed(e.to_string()))?;
        sink.set_volume(self.volume);
        if self.looping {
            sink.append(decoder.repeat_infinite());
        } else {
            sink.append(decoder);
        }
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }
}

/// Read a cue source: `http(s)://` URLs over the network, anything else
/// (optionally `file://`-prefixed) from disk.
fn fetch(cue: Cue, source_url: &str) -> Result<Arc<[u8]>, AudioError> {
    let failed = |message: String| AudioError::LoadFailed {
        cue,
        source_url: source_url.to_string(),
        message,
    };

    if source_url.starts_with("http://") || source_url.starts_with("https://") {
        let response = reqwest::blocking::get(source_url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| failed(e.to_string()))?;
        let bytes = response.bytes().map_err(|e| failed(e.to_string()))?;
        debug!(?cue, bytes = bytes.len(), "fetched cue");
        Ok(Arc::from(&bytes[..]))
    } else {
        let path = source_url.strip_prefix("file://").unwrap_or(source_url);
        let bytes = std::fs::read(path).map_err(|e| failed(e.to_string()))?;
        Ok(Arc::from(bytes))
    }
}
