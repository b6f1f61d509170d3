//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated HOME and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_hearthside-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("HEARTHSIDE_ENV")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_state_json_is_seed() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["state", "--json"]);
    assert_eq!(code, 0, "state --json failed");

    let state: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(state["reminders"].as_array().unwrap().len(), 3);
    assert_eq!(state["eventLog"].as_array().unwrap().len(), 1);
    assert_eq!(state["voiceMessages"].as_array().unwrap().len(), 2);
}

#[test]
fn test_state_summary() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["state"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Take Morning Pills"));
    assert!(stdout.contains("Event log:"));
}

#[test]
fn test_apply_dedups_emotion() {
    let home = tempfile::tempdir().unwrap();
    let happy = r#"{"type":"LOG_EMOTION","emotion":"happy"}"#;
    let (stdout, _, code) = run_cli(home.path(), &["apply", happy, happy]);
    assert_eq!(code, 0);

    let state: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(state["alerts"].as_array().unwrap().len(), 1);
    assert_eq!(
        state["eventLog"][0]["text"],
        "AI companion detected emotion: happy."
    );
}

#[test]
fn test_apply_complete_and_unknown() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &[
            "apply",
            r#"{"type":"COMPLETE_REMINDER","id":"1"}"#,
            r#"{"type":"SNOOZE","minutes":5}"#,
        ],
    );
    assert_eq!(code, 0);

    let state: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(state["reminders"][0]["completed"], true);
    assert_eq!(state["eventLog"].as_array().unwrap().len(), 2);
}

#[test]
fn test_apply_rejects_malformed_json() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["apply", "{not json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "audio.volume", "40"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "audio.volume"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "40");

    assert!(home.path().join(".config/hearthside/config.toml").exists());
}

#[test]
fn test_config_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "get", "audio.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_run_session_from_stdin() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "audio.output", "log"]);
    assert_eq!(code, 0);

    let mut child = Command::new(env!("CARGO_BIN_EXE_hearthside-cli"))
        .arg("run")
        .env("HOME", home.path())
        .env_remove("HEARTHSIDE_ENV")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start CLI session");

    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(b"click\n{\"type\":\"LOG_EMOTION\",\"emotion\":\"calm\"}\nquit\n")
        .unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AI companion detected emotion: calm."));
}
