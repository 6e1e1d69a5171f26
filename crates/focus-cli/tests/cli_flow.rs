//! End-to-end runs of the `focus` binary against a throwaway store.

use std::path::Path;
use std::process::{Command, Output};

use focus_core::export::CSV_HEADER;
use serde_json::Value;
use tempfile::TempDir;

fn focus(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_focus"))
        .args(args)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("XDG_DATA_HOME", dir.join("data"))
        .env("FOCUS_STORE", dir.join("focus.sqlite3"))
        .env_remove("FOCUS_CONFIG")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run focus")
}

fn ok(dir: &Path, args: &[&str]) -> String {
    let output = focus(dir, args);
    assert!(
        output.status.success(),
        "focus {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json(dir: &Path, args: &[&str]) -> Value {
    serde_json::from_str(&ok(dir, args)).expect("stdout should be JSON")
}

#[test]
fn test_full_session_flow() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    ok(root, &["init"]);
    assert!(root.join("config").join("focus").join("config.toml").exists());

    ok(root, &["start", "--seconds", "600", "--task", "Write report"]);
    let status = json(root, &["status", "--json"]);
    assert_eq!(status["status"], "running");
    assert_eq!(status["taskTitle"], "Write report");
    let remaining = status["remainingSec"].as_i64().unwrap();
    assert!((590..=600).contains(&remaining));

    ok(root, &["pause"]);
    assert_eq!(json(root, &["status", "--json"])["status"], "paused");
    ok(root, &["resume"]);
    ok(root, &["distraction"]);
    ok(root, &["distraction", "--kind", "tab-switch"]);

    ok(root, &["finish", "--mood", "productive", "--reflection", "Solid draft"]);
    assert_eq!(json(root, &["status", "--json"])["status"], "idle");

    let history = json(root, &["history", "--json"]);
    assert_eq!(history["count"], 1);
    let session = &history["sessions"][0];
    assert_eq!(session["distractedCount"], 2);
    assert_eq!(session["mood"], "productive");
    assert_eq!(session["taskTitle"], "Write report");
    assert!(history["warning"].is_null());

    let csv = ok(root, &["export", "--format", "csv"]);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    let row = lines.next().unwrap();
    assert!(row.contains("\"Write report\""));
    assert!(row.contains("\"productive\""));
}

#[test]
fn test_illegal_transitions_exit_with_invalid_input() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let output = focus(root, &["pause"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot pause while timer is idle"));

    ok(root, &["start", "--minutes", "5"]);
    assert_eq!(focus(root, &["start", "--minutes", "5"]).status.code(), Some(4));
    assert_eq!(focus(root, &["discard"]).status.code(), Some(4));
    assert_eq!(focus(root, &["start", "--seconds", "0"]).status.code(), Some(4));
}

#[test]
fn test_unknown_preset_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = focus(dir.path(), &["start", "--preset", "33"]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(json(dir.path(), &["status", "--json"])["status"], "idle");
}

#[test]
fn test_erase_requires_confirmation_and_clears_history() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    ok(root, &["start", "--seconds", "60"]);
    ok(root, &["finish", "--skip"]);
    assert_eq!(json(root, &["history", "--json"])["count"], 1);

    assert_eq!(focus(root, &["erase"]).status.code(), Some(4));
    assert_eq!(json(root, &["history", "--json"])["count"], 1);

    ok(root, &["erase", "--yes"]);
    let history = json(root, &["history", "--json"]);
    assert_eq!(history["count"], 0);
    assert!(history["warning"].is_null());
}

#[test]
fn test_bad_mood_keeps_the_timer() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    ok(root, &["start", "--seconds", "300"]);
    assert_eq!(focus(root, &["finish", "--mood", "sleepy"]).status.code(), Some(4));
    assert_eq!(json(root, &["status", "--json"])["status"], "running");
}

#[test]
fn test_unopenable_store_exits_with_storage_code() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let output = Command::new(env!("CARGO_BIN_EXE_focus"))
        .args(["status"])
        .env("XDG_CONFIG_HOME", root.join("config"))
        .env("XDG_DATA_HOME", root.join("data"))
        .env("FOCUS_STORE", root)
        .env_remove("FOCUS_CONFIG")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run focus");
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open store"));
}
