use coderun::types::{ExecutionRequest, TIMEOUT_MESSAGE, TestCase};

use super::{fixture_source, scratch_is_empty, test_runner};

#[tokio::test]
async fn test_suite_counts_and_order() {
    let (runner, scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("echo_line.py"), "python").with_test_cases([
        TestCase::new("first", "first"),
        TestCase::new("second", "SECOND"),
        TestCase::new("  padded  ", "padded"),
    ]);

    let suite = runner.run_tests(&request).await;
    assert_eq!(suite.total_tests, 3);
    assert_eq!(suite.passed_tests, 2);
    assert!(!suite.success);
    let inputs: Vec<&str> = suite.test_results.iter().map(|r| r.input.as_str()).collect();
    assert_eq!(inputs, vec!["first", "second", "  padded  "]);
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_suite_timeout_is_contained_to_case() {
    let (runner, _scratch) = test_runner();
    let code = "import time\nx = input()\nif x == 'slow':\n    time.sleep(30)\nprint(x)\n";
    let request = ExecutionRequest::new(code, "python")
        .with_timeout_seconds(1)
        .with_test_cases([TestCase::new("slow", "slow"), TestCase::new("fast", "fast")]);

    let suite = runner.run_tests(&request).await;
    assert_eq!(suite.test_results[0].error.as_deref(), Some(TIMEOUT_MESSAGE));
    assert!(suite.test_results[1].passed);
    assert_eq!(suite.passed_tests, 1);
}

#[tokio::test]
async fn test_suite_unsupported_language() {
    let (runner, scratch) = test_runner();
    let request = ExecutionRequest::new("puts 1", "ruby").with_test_cases([TestCase::new("", "1")]);

    let suite = runner.run_tests(&request).await;
    assert_eq!(
        suite.compilation_error.as_deref(),
        Some("Unsupported language: ruby")
    );
    assert!(suite.test_results.is_empty());
    assert_eq!(suite.total_tests, 1);
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_concurrent_suites_are_independent() {
    let (runner, _scratch) = test_runner();
    let code = fixture_source("sum.c");
    let a = ExecutionRequest::new(code.clone(), "c").with_test_cases([TestCase::new("1 1", "2")]);
    let b = ExecutionRequest::new(code, "c").with_test_cases([TestCase::new("2 2", "4")]);

    let (ra, rb) = tokio::join!(runner.run_tests(&a), runner.run_tests(&b));
    assert!(ra.success, "{ra:?}");
    assert!(rb.success, "{rb:?}");
}

#[test]
fn test_suite_result_wire_format() {
    let json = r#"{"code":"print(1)","language":"python","testCases":[{"input":"","expectedOutput":"1"}],"timeoutSeconds":2,"memoryLimitMB":64}"#;
    let request: ExecutionRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.cases().len(), 1);
    assert_eq!(request.memory_limit_mb, Some(64));
}
