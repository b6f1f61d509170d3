//! The session event loop.
//!
//! One task owns the store, the audio service, the scheduler and the unlock
//! gate. Front-end commands (gestures included), scheduler ticks and shutdown
//! are multiplexed with `select!` and handled one at a time, so every state
//! transition happens in a single total order. Gestures share the command
//! queue and are handled in the order they were reported.
//!
//! ```text
//! SessionHandle ──commands──┐
//!    interval tick ─────────┴──> Session loop ──> Store ──watch──> subscribers
//!                                     │
//!                                     └──> AudioAlertService
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::audio::{AudioAlertService, AudioBackend};
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::gate::{Gesture, UnlockGate};
use crate::scheduler::ReminderScheduler;
use crate::state::{Action, AppState};
use crate::storage::Config;
use crate::store::Store;

/// Inbound requests from the front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Dispatch(Action),
    /// Start the looping alarm, e.g. when a view observes a new SOS alert.
    PlaySosAlert,
    StopSosAlert,
    /// A user interaction, routed to the unlock gate.
    Gesture(Gesture),
}

pub struct Session {
    store: Store,
    audio: AudioAlertService,
    scheduler: ReminderScheduler,
    gate: UnlockGate,
    listening: Arc<AtomicBool>,
    command_buffer: usize,
}

impl Session {
    pub fn new(store: Store, audio: AudioAlertService, scheduler: ReminderScheduler) -> Self {
        Self {
            store,
            audio,
            scheduler,
            gate: UnlockGate::new(),
            listening: Arc::new(AtomicBool::new(true)),
            command_buffer: 64,
        }
    }

    /// Seeded session wired from configuration.
    pub fn from_config(
        config: &Config,
        clock: Arc<dyn Clock>,
        backend: Box<dyn AudioBackend>,
    ) -> Self {
        let mut session = Self::new(
            Store::seeded(clock),
            AudioAlertService::new(backend, config.audio.clone()),
            ReminderScheduler::new(config.scheduler.poll_interval()),
        );
        session.command_buffer = config.session.command_buffer.max(1);
        session
    }

    /// Start the loop on the current tokio runtime.
    pub fn spawn(self) -> SessionHandle {
        let (commands_tx, commands_rx) = mpsc::channel(self.command_buffer);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let state = self.store.subscribe();
        let listening = Arc::clone(&self.listening);

        let task = tokio::spawn(self.run(commands_rx, shutdown_rx));

        SessionHandle {
            commands: commands_tx,
            listening,
            state,
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> Arc<AppState> {
        let period = self.scheduler.period();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(poll_secs = period.as_secs(), "session started");

        loop {
            tokio::select! {
                // Due polls first, then queued commands, then shutdown.
                biased;

                _ = ticker.tick() => {
                    let fired = self.scheduler.tick(&mut self.store, &mut self.audio);
                    if fired > 0 {
                        debug!(fired, "reminder poll");
                    }
                }

                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },

                _ = &mut shutdown => break,
            }
        }

        self.gate.cancel();
        self.listening.store(false, Ordering::Release);
        self.audio.stop_sos_alert();
        info!("session stopped");
        self.store.state()
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Dispatch(action) => {
                self.store.dispatch(action);
            }
            SessionCommand::PlaySosAlert => self.audio.play_sos_alert(),
            SessionCommand::StopSosAlert => self.audio.stop_sos_alert(),
            SessionCommand::Gesture(gesture) => {
                if self.gate.on_gesture(gesture, &mut self.audio) {
                    self.listening.store(false, Ordering::Release);
                }
            }
        }
    }
}

/// Front-end side of a running [`Session`].
///
/// Dropping the handle stops the loop.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    listening: Arc<AtomicBool>,
    state: watch::Receiver<Arc<AppState>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Arc<AppState>>,
}

impl SessionHandle {
    pub async fn dispatch(&self, action: Action) -> Result<()> {
        self.send(SessionCommand::Dispatch(action)).await
    }

    pub async fn play_sos_alert(&self) -> Result<()> {
        self.send(SessionCommand::PlaySosAlert).await
    }

    pub async fn stop_sos_alert(&self) -> Result<()> {
        self.send(SessionCommand::StopSosAlert).await
    }

    pub async fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CoreError::SessionClosed)
    }

    /// Report a user gesture. Returns `false` once the unlock gate has fired
    /// and stopped listening, or when the command queue is full.
    pub fn gesture(&self, gesture: Gesture) -> bool {
        self.listening.load(Ordering::Acquire)
            && self
                .commands
                .try_send(SessionCommand::Gesture(gesture))
                .is_ok()
    }

    /// Receiver of every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state.borrow())
    }

    /// Stop the scheduler and gate, and return the final state.
    pub async fn shutdown(mut self) -> Result<Arc<AppState>> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.task).await.map_err(|_| CoreError::SessionClosed)
    }
}
