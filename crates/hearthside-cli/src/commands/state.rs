use std::sync::Arc;

use hearthside_core::{Action, AppState, Store, SystemClock};

pub(crate) fn print_summary(state: &AppState) {
    println!("Reminders:");
    for r in &state.reminders {
        let mark = if r.completed {
            "x"
        } else if r.notified {
            "!"
        } else {
            " "
        };
        println!("  [{mark}] {} {} ({})", r.time, r.title, r.id);
    }

    let pending = state.unacknowledged_alerts().count();
    println!("Alerts: {} ({pending} awaiting acknowledgement)", state.alerts.len());
    for a in &state.alerts {
        println!("  {:?} {} - {}", a.kind, a.timestamp, a.message);
    }

    if let Some(quote) = &state.shared_quote {
        println!("Quote: \"{}\"", quote.text);
    }
    println!(
        "Memories: {}  Voice messages: {}",
        state.memories.len(),
        state.voice_messages.len()
    );

    println!("Event log:");
    for e in &state.event_log {
        println!("  {} {}", e.timestamp, e.text);
    }
}

pub fn show(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::with_system_clock();
    let state = store.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&*state)?);
    } else {
        print_summary(&state);
    }
    Ok(())
}

pub fn apply(raw: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let actions = raw
        .iter()
        .map(|s| serde_json::from_str::<Action>(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut store = Store::seeded(Arc::new(SystemClock));
    for action in actions {
        if action == Action::Unknown {
            tracing::warn!("ignoring unknown action");
        }
        store.dispatch(action);
    }

    println!("{}", serde_json::to_string_pretty(&*store.state())?);
    Ok(())
}
