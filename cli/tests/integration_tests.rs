use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copies a fixture into `dir` since every run truncates the transcript.
fn stage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::copy(fixture_path(name), &path).expect("failed to stage fixture");
    path
}

fn fault_summary(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fault-summary"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run fault-summary")
}

#[test]
fn writes_report_next_to_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = stage(dir.path(), "distance-tty.txt");

    let output = fault_summary(&[transcript.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report = dir.path().join("Fault Summary - TTY Window.xlsx");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim_end(),
        format!("Spreadsheet saved at: {}", report.display())
    );

    let book = umya_spreadsheet::reader::xlsx::read(&report).unwrap();
    let sheet = book.get_sheet_by_name("Fault Summary").unwrap();
    assert_eq!(sheet.get_value((6, 2)), "NEVADA G1 T1");
    assert_eq!(sheet.get_value((13, 1)), "Max Impedance by Relay");

    let truncated = fs::read_to_string(&transcript).unwrap();
    assert!(truncated.starts_with("Fault description:\n1. Bus Fault on:  NEVADA"));
}

#[test]
fn prints_dataset_as_json_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = stage(dir.path(), "overcurrent-tty.txt");

    let output = fault_summary(&[
        transcript.to_str().unwrap(),
        "--format",
        "json",
        "--no-report",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["curve"], "overcurrent");
    assert_eq!(value["records"].as_array().unwrap().len(), 3);
    assert_eq!(value["records"][0]["relay"], "BUS A OC1 TOC");
    assert_eq!(value["records"][0]["fault_current"], "1523.4A");
    assert!(value.get("statistics").is_none());

    assert!(!dir.path().join("Fault Summary - TTY Window.xlsx").exists());
}

#[test]
fn config_file_sets_report_name() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = stage(dir.path(), "distance-tty.txt");
    let config = dir.path().join("run.yaml");
    fs::write(
        &config,
        "report_file_name: relays.xlsx\nsheet_name: Distance\n",
    )
    .unwrap();

    let output = fault_summary(&[
        transcript.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--curve",
        "distance",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let book = umya_spreadsheet::reader::xlsx::read(dir.path().join("relays.xlsx")).unwrap();
    assert!(book.get_sheet_by_name("Distance").is_some());
}

#[test]
fn missing_transcript_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");

    let output = fault_summary(&[missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: Failed to process"), "{stderr}");
}

#[test]
fn wait_times_out_on_missing_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");

    let output = fault_summary(&[
        missing.to_str().unwrap(),
        "--wait",
        "--wait-timeout",
        "0",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("timed out"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = stage(dir.path(), "distance-tty.txt");
    let config = dir.path().join("run.yaml");
    fs::write(&config, "retry_interval_ms: 0\n").unwrap();

    let output = fault_summary(&[
        transcript.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("retry_interval_ms"));
    // Nothing was processed, so the transcript is untouched.
    assert_eq!(
        fs::read_to_string(&transcript).unwrap(),
        fs::read_to_string(fixture_path("distance-tty.txt")).unwrap()
    );
}

#[test]
fn sheet_name_excel_rejects_fails_before_truncation() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = stage(dir.path(), "distance-tty.txt");

    let output = fault_summary(&[
        transcript.to_str().unwrap(),
        "--sheet-name",
        "Faults 10/19",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("sheet_name"));
    assert_eq!(
        fs::read_to_string(&transcript).unwrap(),
        fs::read_to_string(fixture_path("distance-tty.txt")).unwrap()
    );
    assert!(!dir.path().join("Fault Summary - TTY Window.xlsx").exists());
}
