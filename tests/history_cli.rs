//! Integration tests for the `history` subcommands
//!
//! These run the real binary against a temporary bug history file:
//! - Listing (with filters) newest first
//! - Summaries
//! - Clearing, with and without confirmation
//! - Recovering from an unreadable history file

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Helper to run parley with an isolated config and data directory
fn run_parley(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_parley"))
        .env("PARLEY_DIR", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("xdg_config"))
        .env_remove("PARLEY_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute parley")
}

fn run_parley_stdout(home: &Path, args: &[&str]) -> String {
    let output = run_parley(home, args);
    assert!(
        output.status.success(),
        "parley {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn record(date: &str, language: &str, error_type: &str) -> serde_json::Value {
    serde_json::json!({
        "date": date,
        "language": language,
        "error_type": error_type,
        "mistake": "See full analysis",
        "wrong_code": "See full analysis",
        "correct_code": "See full analysis",
        "explanation": format!("{} went wrong", error_type),
    })
}

/// Write three records, oldest first
fn seed_store(path: &Path) {
    let records = vec![
        record("01-01-2024", "Python", "TypeError"),
        record("02-01-2024", "Java", "NullPointerException"),
        record("03-01-2024", "python", "Mixed/Multiple"),
    ];
    fs::write(path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
}

fn list_json(home: &Path, store: &Path, extra: &[&str]) -> Vec<serde_json::Value> {
    let store = store.to_str().unwrap();
    let mut args = vec!["history", "list", "--store", store, "-o", "json"];
    args.extend_from_slice(extra);
    serde_json::from_str(&run_parley_stdout(home, &args)).expect("list output is JSON")
}

#[test]
fn test_list_missing_store_is_empty() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("bug_history.json");

    assert!(list_json(home.path(), &store, &[]).is_empty());
    assert!(!store.exists());
}

#[test]
fn test_list_newest_first() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("bug_history.json");
    seed_store(&store);

    let records = list_json(home.path(), &store, &[]);
    let dates: Vec<&str> = records.iter().map(|r| r["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["03-01-2024", "02-01-2024", "01-01-2024"]);
}

#[test]
fn test_list_filters() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("bug_history.json");
    seed_store(&store);

    let python = list_json(home.path(), &store, &["--language", "PYTHON"]);
    assert_eq!(python.len(), 2);

    let null = list_json(home.path(), &store, &["--error-type", "null"]);
    assert_eq!(null.len(), 1);
    assert_eq!(null[0]["language"], "Java");

    let both = list_json(home.path(), &store, &["--language", "python", "--error-type", "type"]);
    assert_eq!(both.len(), 1);
    assert_eq!(both[0]["error_type"], "TypeError");
}

#[test]
fn test_list_corrupt_store_is_empty() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("bug_history.json");
    fs::write(&store, "{ not json").unwrap();

    assert!(list_json(home.path(), &store, &[]).is_empty());
    // Reading never rewrites the file
    assert_eq!(fs::read_to_string(&store).unwrap(), "{ not json");
}

#[test]
fn test_summary_counts() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("bug_history.json");
    seed_store(&store);

    let stdout = run_parley_stdout(
        home.path(),
        &["history", "summary", "--store", store.to_str().unwrap(), "-o", "json"],
    );
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(summary["total"], 3);
    assert_eq!(summary["by_language"]["Python"], 1);
    assert_eq!(summary["by_language"]["python"], 1);
    assert_eq!(summary["by_error_type"]["NullPointerException"], 1);
}

#[test]
fn test_clear_with_yes() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("bug_history.json");
    seed_store(&store);

    let stdout = run_parley_stdout(home.path(), &["history", "clear", "--yes", "--store", store.to_str().unwrap()]);
    assert!(stdout.contains("Cleared bug history"));

    let content: Vec<serde_json::Value> = serde_json::from_str(&fs::read_to_string(&store).unwrap()).unwrap();
    assert!(content.is_empty());
}

#[test]
fn test_clear_without_confirmation_keeps_records() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("bug_history.json");
    seed_store(&store);

    let stdout = run_parley_stdout(home.path(), &["history", "clear", "--store", store.to_str().unwrap()]);
    assert!(stdout.contains("Aborted"));
    assert_eq!(list_json(home.path(), &store, &[]).len(), 3);
}

#[test]
fn test_store_path_from_config_file() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("from_config.json");
    seed_store(&store);

    let config_dir = home.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("parley.yaml"),
        format!("store:\n  path: {}\n", store.display()),
    )
    .unwrap();

    let stdout = run_parley_stdout(home.path(), &["history", "list", "-o", "json"]);
    let records: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    let stdout = run_parley_stdout(home.path(), &["completions", "bash"]);
    assert!(stdout.contains("parley"));
}
