use coderun::types::{ExecutionRequest, TIMEOUT_MESSAGE};

use super::{fixture_source, scratch_is_empty, test_runner};

#[tokio::test]
async fn test_python_sum() {
    let (runner, scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("sum.py"), "python").with_input("2 40");

    let result = runner.run_once(&request).await;
    assert!(result.success, "{result:?}");
    assert_eq!(result.output.as_deref(), Some("42"));
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_python_runtime_error_reports_traceback() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("runtime_error.py"), "python");

    let result = runner.run_once(&request).await;
    assert!(!result.success);
    let error = result.error.expect("error should be set");
    assert!(error.contains("ValueError: bad input"), "{error}");
    assert!(result.compilation_error.is_none());
}

#[tokio::test]
async fn test_python_infinite_loop_times_out() {
    let (runner, scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("infinite_loop.py"), "python")
        .with_timeout_seconds(1);

    let started = std::time::Instant::now();
    let result = runner.run_once(&request).await;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some(TIMEOUT_MESSAGE));
    assert!(started.elapsed().as_secs() < 5);
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_language_id_is_case_insensitive() {
    let (runner, _scratch) = test_runner();
    let request =
        ExecutionRequest::new(fixture_source("echo_line.py"), "PYTHON").with_input("hello");

    let result = runner.run_once(&request).await;
    assert_eq!(result.output.as_deref(), Some("hello"));
}

#[tokio::test]
#[ignore = "requires node"]
async fn test_javascript_sum() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("sum.js"), "javascript").with_input("7 8");

    let result = runner.run_once(&request).await;
    assert!(result.success, "{result:?}");
    assert_eq!(result.output.as_deref(), Some("15"));
}
