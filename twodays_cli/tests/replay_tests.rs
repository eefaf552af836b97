//! Replay tests for the twodays binary.
//!
//! These tests feed JSON Lines action scripts through the store and check
//! the printed snapshot, including:
//! - Level-up and streak rules
//! - No-op actions on unknown ids
//! - Malformed scripts

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn cli(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("twodays"));
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a script into the temp dir and replay it, returning the snapshot
fn replay(temp_dir: &TempDir, script: &str) -> Value {
    let script_path = temp_dir.path().join("actions.jsonl");
    fs::write(&script_path, script).expect("Failed to write script");

    let output = cli(temp_dir)
        .arg("replay")
        .arg(&script_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("Snapshot is not valid JSON")
}

#[test]
fn test_empty_script_prints_seed() {
    let temp_dir = setup_test_dir();

    let state = replay(&temp_dir, "");

    assert_eq!(state["user"]["level"], 1);
    assert_eq!(state["badges"].as_array().unwrap().len(), 1);
    assert_eq!(state["achievements"].as_array().unwrap().len(), 2);
    assert_eq!(state["notifications"].as_array().unwrap().len(), 2);
    assert_eq!(state["has_completed_onboarding"], false);
}

#[test]
fn test_replay_level_up_and_streak() {
    let temp_dir = setup_test_dir();

    let state = replay(
        &temp_dir,
        r#"{"type":"ADD_EXPERIENCE","payload":90}
{"type":"ADD_EXPERIENCE","payload":20}
{"type":"UPDATE_STREAK","payload":4}

{"type":"UPDATE_STREAK","payload":2}
"#,
    );

    let user = &state["user"];
    assert_eq!(user["level"], 2);
    assert_eq!(user["experience"], 10);
    assert_eq!(user["experience_to_next_level"], 120);
    assert_eq!(user["total_experience"], 110);
    assert_eq!(user["points"], 55);
    assert_eq!(user["streak"], 2);
    assert_eq!(user["longest_streak"], 4);
}

#[test]
fn test_replay_toggle_and_flags() {
    let temp_dir = setup_test_dir();

    let state = replay(
        &temp_dir,
        r#"{"type":"TOGGLE_NOTIFICATIONS_ENABLED"}
{"type":"COMPLETE_ONBOARDING"}
{"type":"COMPLETE_PROFILE_REGISTRATION"}
{"type":"ADD_BADGE","payload":"1"}
{"type":"RESET_PROGRESS"}
"#,
    );

    assert_eq!(state["notifications_enabled"], false);
    assert_eq!(state["has_completed_onboarding"], true);
    assert_eq!(state["has_completed_profile_registration"], true);
    assert_eq!(state["badges"][0]["is_received"], false);
    assert!(state["badges"][0]["received_at"].is_null());
    assert!(state["current_task"].is_null());
}

#[test]
fn test_replay_unknown_ids_change_nothing() {
    let temp_dir = setup_test_dir();

    let state = replay(
        &temp_dir,
        r#"{"type":"MARK_NOTIFICATION_READ","payload":"nonexistent"}
{"type":"UNLOCK_ACHIEVEMENT","payload":"nonexistent"}
{"type":"LEARN_VOCABULARY_WORD","payload":"nonexistent"}
"#,
    );

    let notifications = state["notifications"].as_array().unwrap();
    assert!(notifications.iter().all(|n| n["is_read"] == false));
    let achievements = state["achievements"].as_array().unwrap();
    assert!(achievements.iter().all(|a| a["is_unlocked"] == false));
    assert_eq!(state["user"]["words_learned"], 0);
}

#[test]
fn test_replay_vocabulary() {
    let temp_dir = setup_test_dir();

    let state = replay(
        &temp_dir,
        r#"{"type":"ADD_VOCABULARY_WORD","payload":{"id":"w1","word":"gato","translation":"cat"}}
{"type":"LEARN_VOCABULARY_WORD","payload":"w1"}
"#,
    );

    assert_eq!(state["vocabulary"][0]["is_learned"], true);
    assert_eq!(state["vocabulary"][0]["times_reviewed"], 1);
    assert_eq!(state["user"]["words_learned"], 1);
}

#[test]
fn test_replay_from_stdin() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("replay")
        .arg("-")
        .arg("--pretty")
        .write_stdin("{\"type\":\"ADD_EXPERIENCE\",\"payload\":40}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_experience\": 40"));
}

#[test]
fn test_debug_logging_keeps_stdout_json() {
    let temp_dir = setup_test_dir();
    let script_path = temp_dir.path().join("actions.jsonl");
    fs::write(&script_path, "{\"type\":\"ADD_EXPERIENCE\",\"payload\":40}\n").unwrap();

    let assert = cli(&temp_dir)
        .env("RUST_LOG", "twodays_core=debug")
        .arg("replay")
        .arg(&script_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("dispatch"));

    let state: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(state["user"]["total_experience"], 40);
}

#[test]
fn test_replay_huge_experience_saturates() {
    let temp_dir = setup_test_dir();

    let state = replay(
        &temp_dir,
        r#"{"type":"ADD_EXPERIENCE","payload":10}
{"type":"ADD_EXPERIENCE","payload":18446744073709551615}
"#,
    );

    assert_eq!(state["user"]["total_experience"], u64::MAX);
    assert_eq!(state["user"]["rank"], "Diamond");
}

#[test]
fn test_malformed_line_reports_line_number() {
    let temp_dir = setup_test_dir();
    let script_path = temp_dir.path().join("broken.jsonl");
    fs::write(
        &script_path,
        "{\"type\":\"ADD_EXPERIENCE\",\"payload\":40}\n{ invalid json }\n",
    )
    .unwrap();

    cli(&temp_dir)
        .arg("replay")
        .arg(&script_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line: 2"));
}

#[test]
fn test_unknown_action_type_fails() {
    let temp_dir = setup_test_dir();
    let script_path = temp_dir.path().join("unknown.jsonl");
    fs::write(&script_path, "{\"type\":\"DELETE_USER\"}\n").unwrap();

    cli(&temp_dir)
        .arg("replay")
        .arg(&script_path)
        .assert()
        .failure();
}

#[test]
fn test_missing_script_fails() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("replay")
        .arg(temp_dir.path().join("missing.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Io"));
}
