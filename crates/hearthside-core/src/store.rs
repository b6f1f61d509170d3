//! Snapshot holder and dispatch entry point.
//!
//! The store owns the only [`AppState`] value. Each dispatch stamps the
//! action, runs the reducer, swaps in the new `Arc` and publishes it on a
//! watch channel. Readers hold `Arc`s to old snapshots, which never change.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::clock::{Clock, Stamp, SystemClock};
use crate::state::{self, Action, AppState};

pub struct Store {
    snapshot: Arc<AppState>,
    seq: u64,
    clock: Arc<dyn Clock>,
    tx: watch::Sender<Arc<AppState>>,
}

impl Store {
    pub fn new(initial: AppState, clock: Arc<dyn Clock>) -> Self {
        let snapshot = Arc::new(initial);
        let (tx, _rx) = watch::channel(Arc::clone(&snapshot));
        Self {
            snapshot,
            seq: 0,
            clock,
            tx,
        }
    }

    /// Store bootstrapped with the sample household.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let initial = AppState::seed(&Stamp::new(0, clock.now()));
        Self::new(initial, clock)
    }

    /// Seeded store on the host clock.
    pub fn with_system_clock() -> Self {
        Self::seeded(Arc::new(SystemClock))
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current snapshot.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.snapshot)
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.tx.subscribe()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply `action` and return the resulting snapshot.
    ///
    /// Subscribers are only woken when the state actually changed.
    pub fn dispatch(&mut self, action: Action) -> Arc<AppState> {
        self.seq += 1;
        let stamp = Stamp::new(self.seq, self.clock.now());
        let next = state::apply(&self.snapshot, &action, &stamp);

        if next == *self.snapshot {
            debug!(action = action.type_name(), seq = stamp.seq, "no-op transition");
            return self.state();
        }

        debug!(action = action.type_name(), seq = stamp.seq, "state transition");
        self.snapshot = Arc::new(next);
        self.tx.send_replace(Arc::clone(&self.snapshot));
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::state::{Alert, Reminder, ReminderIcon};

    fn store() -> Store {
        Store::seeded(Arc::new(ManualClock::at(9, 0)))
    }

    #[test]
    fn dispatch_replaces_snapshot_atomically() {
        let mut store = store();
        let before = store.state();
        let after = store.dispatch(Action::complete_reminder("1"));

        assert!(!before.reminder("1").unwrap().completed);
        assert!(after.reminder("1").unwrap().completed);
        assert!(Arc::ptr_eq(&after, &store.state()));
    }

    #[test]
    fn subscribers_see_changes_but_not_noops() {
        let mut store = store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.dispatch(Action::Unknown);
        assert!(!rx.has_changed().unwrap());

        store.dispatch(Action::TriggerSos { alert: Alert::sos() });
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().alerts.len(), 1);
    }

    #[test]
    fn generated_ids_stay_unique_under_rapid_dispatch() {
        let mut store = store();
        for i in 0..50 {
            let reminder = Reminder::new(format!("Task {i}"), "12:00", ReminderIcon::Other);
            store.dispatch(Action::AddReminder { reminder });
        }
        let state = store.state();
        let mut ids: Vec<_> = state.event_log.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), state.event_log.len());
    }
}
