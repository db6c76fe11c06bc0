// tests/execution_fake_launcher.rs

mod common;
use crate::common::{FakeLauncher, FakeRun, LogHarness, init_tracing, messages_at, read_log};

use proptest::prelude::*;

use devrun::exec::{log_file_stem, sanitize_command_name};
use devrun::types::{ExecutionRequest, ExecutionResult};

#[tokio::test]
async fn fake_output_is_logged_and_mirrored() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::with_runs([FakeRun::exit(0)
        .stdout(["line one", "line two"])
        .stderr(["warning: something"])]);
    let executor = harness.executor(launcher.clone());

    let request = ExecutionRequest::new(["tool", "--go"]).unwrap();
    let report = executor.execute(&request).await;

    assert_eq!(report.result, ExecutionResult::Exited(0));
    assert_eq!(launcher.launches(), vec![vec!["tool".to_string(), "--go".to_string()]]);

    let log = read_log(&report.log_file.unwrap());
    let info = messages_at(&log, "INFO");
    assert!(info.contains(&"line one".to_string()));
    assert!(info.contains(&"line two".to_string()));
    assert!(messages_at(&log, "ERROR").contains(&"warning: something".to_string()));

    let mirrored = harness.mirror.lines();
    assert!(mirrored.contains(&"line one".to_string()));
    assert!(mirrored.contains(&"warning: something".to_string()));
}

#[tokio::test]
async fn streaming_phase_is_entered_before_any_child_line() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::with_runs([FakeRun::exit(0).stdout(["hi"]).stderr(["oops"])]);
    let executor = harness.executor(launcher);

    let report = executor.execute(&ExecutionRequest::new(["tool"]).unwrap()).await;
    let log = read_log(&report.log_file.unwrap());
    let lines: Vec<&str> = log.lines().collect();

    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("no line containing {needle:?} in:\n{log}"))
    };
    let streaming = position("to=StreamingBothPipes");
    let exited = position("to=ChildExited");

    assert!(lines[streaming].contains("from=Launched"));
    assert!(streaming < position(" INFO hi"));
    assert!(streaming < position(" ERROR oops"));
    assert!(position(" INFO hi") < exited);
    assert!(position(" ERROR oops") < exited);
}

#[tokio::test]
async fn trailing_whitespace_is_trimmed() {
    init_tracing();
    let harness = LogHarness::new();
    let launcher = FakeLauncher::with_runs([FakeRun::exit(0).stdout(["padded   ", "tab\t"])]);
    let executor = harness.executor(launcher);

    let report = executor.execute(&ExecutionRequest::new(["tool"]).unwrap()).await;
    let log = read_log(&report.log_file.unwrap());

    let info = messages_at(&log, "INFO");
    assert!(info.contains(&"padded".to_string()));
    assert!(info.contains(&"tab".to_string()));
}

#[tokio::test]
async fn launch_not_found_maps_to_127() {
    init_tracing();
    let harness = LogHarness::new();
    let executor = harness.executor(FakeLauncher::with_runs([FakeRun::not_found()]));

    let report = executor.execute(&ExecutionRequest::new(["ghost"]).unwrap()).await;

    assert_eq!(report.result, ExecutionResult::CommandNotFound);
    assert_eq!(report.exit_code(), ExecutionResult::COMMAND_NOT_FOUND_CODE);
    assert!(harness.console.contents().contains("Command not found: 'ghost'"));
}

#[tokio::test]
async fn console_level_filters_status_lines() {
    init_tracing();
    let harness = LogHarness::new();
    let config = harness.config().with_console_level(tracing::Level::ERROR);
    let executor = devrun::exec::Executor::new(FakeLauncher::with_runs([FakeRun::exit(0)]), config);

    let report = executor.execute(&ExecutionRequest::new(["quiet"]).unwrap()).await;
    assert_eq!(report.exit_code(), 0);

    // INFO status lines stay out of the console but still reach the file.
    assert!(!harness.console.contents().contains("Executing command"));
    assert!(read_log(&report.log_file.unwrap()).contains("Executing command: quiet"));
}

#[test]
fn sanitize_replaces_non_alphanumerics_in_first_token() {
    assert_eq!(sanitize_command_name("python3 script.py --x"), "python3");
    assert_eq!(sanitize_command_name("./build.sh all"), "__build_sh");
    assert_eq!(sanitize_command_name("/usr/bin/env"), "_usr_bin_env");
}

#[test]
fn log_file_stem_has_second_resolution_stamp() {
    use chrono::TimeZone;
    let at = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
    assert_eq!(log_file_stem("make", at), "make_2024-03-09_07-05-01");
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn exit_code_and_lines_are_preserved(
        code in 0i32..=255,
        out in proptest::collection::vec("[a-z0-9]{1,12}", 0..8),
        err in proptest::collection::vec("[A-Z0-9]{1,12}", 0..8),
    ) {
        let harness = LogHarness::new();
        let launcher = FakeLauncher::with_runs([
            FakeRun::exit(code).stdout(out.clone()).stderr(err.clone()),
        ]);
        let executor = harness.executor(launcher);

        let report = block_on(executor.execute(&ExecutionRequest::new(["prog"]).unwrap()));
        prop_assert_eq!(report.exit_code(), code);

        let log = read_log(&report.log_file.unwrap());
        let info: Vec<String> = messages_at(&log, "INFO")
            .into_iter()
            .filter(|m| out.contains(m))
            .collect();
        let errors: Vec<String> = messages_at(&log, "ERROR")
            .into_iter()
            .filter(|m| err.contains(m))
            .collect();
        prop_assert_eq!(info, out);
        prop_assert_eq!(errors, err);
    }
}
