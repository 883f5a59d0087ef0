use ridgeline_tools::{ExecutionPlan, ProcessAdapter, TokioProcessAdapter, ToolError};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_missing_executable_is_spawn_error() {
    let plan = ExecutionPlan::new("ridgeline-definitely-not-installed");
    let err = TokioProcessAdapter
        .execute(&plan, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Spawn { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn test_output_and_exit_code_are_captured() {
    let plan = ExecutionPlan::new("sh")
        .arg("-c")
        .arg("echo hello; echo oops >&2; exit 3");
    let output = TokioProcessAdapter
        .execute(&plan, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(output.code, Some(3));
    assert!(!output.success());
    assert_eq!(output.stdout.trim(), "hello");
    assert_eq!(output.stderr.trim(), "oops");
}

#[cfg(unix)]
#[tokio::test]
async fn test_timeout_kills_process() {
    let plan = ExecutionPlan::new("sleep").arg("10");
    let started = Instant::now();
    let err = TokioProcessAdapter
        .execute(&plan, Duration::from_millis(100))
        .await
        .unwrap_err();
    match err {
        ToolError::Timeout { command, timeout_ms } => {
            assert_eq!(command, "sleep");
            assert_eq!(timeout_ms, 100);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(started.elapsed() < Duration::from_secs(5));
}
