// tests/run_binary.rs

use std::process::Command;

#[test]
fn run_without_command_prints_usage_and_exits_1() {
    let output = Command::new(env!("CARGO_BIN_EXE_run"))
        .output()
        .expect("spawn run binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: run <command> [args...]"), "stderr: {stderr}");
}

#[cfg(unix)]
#[test]
fn run_forwards_child_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");

    let output = Command::new(env!("CARGO_BIN_EXE_run"))
        .arg("--logs-dir")
        .arg(&logs)
        .args(["sh", "-c", "echo forwarded; exit 5"])
        .output()
        .expect("spawn run binary");

    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stdout).contains("forwarded"));
    assert_eq!(std::fs::read_dir(&logs).unwrap().count(), 1);
}
