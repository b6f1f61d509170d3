use std::sync::Arc;

use hearthside_core::{
    Action, AudioBackend, AudioOutput, Config, Gesture, Session, SystemClock, TracingBackend,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use super::state::print_summary;

const HELP: &str = "commands: click | touch | sos | stop | state | help | quit | <action JSON>";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let backend = audio_backend(&config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(config, backend))
}

fn audio_backend(config: &Config) -> Box<dyn AudioBackend> {
    match config.audio.output {
        AudioOutput::Log => Box::new(TracingBackend),
        AudioOutput::Speaker => speaker_backend(),
    }
}

#[cfg(feature = "speaker")]
fn speaker_backend() -> Box<dyn AudioBackend> {
    match hearthside_core::SpeakerBackend::open() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            warn!(error = %e, "no audio device; cues will only be logged");
            Box::new(TracingBackend)
        }
    }
}

#[cfg(not(feature = "speaker"))]
fn speaker_backend() -> Box<dyn AudioBackend> {
    warn!("built without the `speaker` feature; cues will only be logged");
    Box::new(TracingBackend)
}

async fn drive(
    config: Config,
    backend: Box<dyn AudioBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = Session::from_config(&config, Arc::new(SystemClock), backend).spawn();

    // Echo new audit entries as they land.
    let mut rx = handle.subscribe();
    let printer = tokio::spawn(async move {
        let mut seen = rx.borrow().event_log.len();
        while rx.changed().await.is_ok() {
            let state = Arc::clone(&rx.borrow_and_update());
            let fresh = state.event_log.len().saturating_sub(seen);
            for entry in state.event_log[..fresh].iter().rev() {
                println!("[{}] {}", entry.timestamp, entry.text);
            }
            seen = state.event_log.len();
        }
    });

    eprintln!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => eprintln!("{HELP}"),
            "click" => report_gesture(handle.gesture(Gesture::Click)),
            "touch" => report_gesture(handle.gesture(Gesture::Touch)),
            "sos" => handle.play_sos_alert().await?,
            "stop" => handle.stop_sos_alert().await?,
            "state" => print_summary(&handle.snapshot()),
            raw => match serde_json::from_str::<Action>(raw) {
                Ok(action) => handle.dispatch(action).await?,
                Err(e) => eprintln!("invalid action: {e}"),
            },
        }
    }

    let final_state = handle.shutdown().await?;
    printer.await?;
    tracing::info!(
        log_entries = final_state.event_log.len(),
        alerts = final_state.alerts.len(),
        "session ended"
    );
    Ok(())
}

fn report_gesture(delivered: bool) {
    if !delivered {
        eprintln!("audio already unlocked");
    }
}
