//! Basic CLI E2E tests.
//!
//! Every test runs the built binary against its own config directory and
//! without a Google access token.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

const NOT_SET_UP: &str = "Google tasklist not set up for this bot.";

fn command(config_dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_roomtasks"));
    cmd.args(args)
        .env("ROOMTASKS_CONFIG_DIR", config_dir)
        .env_remove("GOOGLE_TASKS_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = command(config_dir, args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_list_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0, "config list failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["digest"]["hour"], 7);
    assert_eq!(parsed["google"]["access_token_env"], "GOOGLE_TASKS_ACCESS_TOKEN");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "digest.hour", "8"]);
    assert_eq!(code, 0, "config set failed");
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "digest.hour"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "8");
}

#[test]
fn test_config_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: unknown key: no.such.key"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "digest.hour", "seven"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_send_without_token() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["send", "--room", "!room:example.org", "!googletasks", "today"],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), NOT_SET_UP);
}

#[test]
fn test_chat_answers_only_bot_commands() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = command(dir.path(), &["chat", "--room", "!room:example.org"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"hello there\n!googletasksfoo\n!googletasks show 1\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec![NOT_SET_UP]);
}

#[test]
fn test_commands_needing_google_fail_without_token() {
    let dir = tempfile::tempdir().unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["task", "lists"]);
    assert_eq!(code, 1);
    assert!(stderr.contains(NOT_SET_UP));

    let (_, stderr, code) = run_cli(dir.path(), &["task", "new-list", "Groceries"]);
    assert_eq!(code, 1);
    assert!(stderr.contains(NOT_SET_UP));

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["task", "update", "--list", "Work", "t1", "--title", "New", "--move-to", "Home"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains(NOT_SET_UP));

    let (_, stderr, code) = run_cli(dir.path(), &["digest", "--force"]);
    assert_eq!(code, 1);
    assert!(stderr.contains(NOT_SET_UP));
}

#[test]
fn test_rooms_without_associations() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["rooms", "list"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "No rooms have task lists.");

    let (_, stderr, code) = run_cli(dir.path(), &["rooms", "del", "!room:example.org", "Work"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("'Work' is not associated with !room:example.org"));
}
