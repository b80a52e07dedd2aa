//! Binary-level checks: exit codes and argument handling.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn nrcgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_nrcgen"))
}

#[test]
fn generate_jsonl_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("data.jsonl");
    let stats = temp_dir.path().join("stats.json");

    let status = nrcgen()
        .args(["generate", "--rows", "12", "--seed", "3", "--no-progress"])
        .arg("--output")
        .arg(&output)
        .arg("--stats")
        .arg(&stats)
        .status()
        .unwrap();
    assert!(status.success());

    // Format inferred from the extension
    let lines = fs::read_to_string(&output).unwrap().lines().count();
    assert!(lines > 0 && lines <= 12);

    let stats: serde_json::Value = serde_json::from_str(&fs::read_to_string(&stats).unwrap()).unwrap();
    assert_eq!(stats["requested_rows"], 12);
    assert_eq!(stats["generated_rows"], lines);
}

#[test]
fn negative_row_count_is_rejected_before_generation() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("data.jsonl");

    let status = nrcgen()
        .args(["generate", "--rows=-5"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!output.exists());
}

#[test]
fn unknown_format_is_rejected() {
    let status = nrcgen()
        .args(["generate", "--format", "csv", "--rows", "1"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn validate_requires_config() {
    let status = nrcgen().arg("validate").status().unwrap();
    assert!(!status.success());
}

#[test]
fn validate_accepts_written_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("nrcgen.toml");
    fs::write(&config, "[generation]\nrows = 10\nseed = 9\n").unwrap();

    let status = nrcgen()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn inspect_reports_label() {
    let out = nrcgen().args(["inspect", "0"]).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Label:"));
    assert!(stdout.contains("excluded"));
}

#[test]
fn inspect_accepts_extreme_fibonacci_index() {
    let out = nrcgen()
        .args(["inspect", "1", "-n", "-2147483648"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().contains("Binet F(-2147483648)"));
}

#[cfg(not(feature = "parquet"))]
#[test]
fn parquet_without_backend_exits_with_one() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("data.parquet");

    let status = nrcgen()
        .args(["generate", "--rows", "5", "--no-progress"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
    assert!(!output.exists());
}
