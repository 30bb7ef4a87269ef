use coderun::types::{ExecutionRequest, TestCase};

use super::{fixture_source, scratch_is_empty, test_runner};

#[tokio::test]
async fn test_c_sum() {
    let (runner, scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("sum.c"), "c").with_input("3 4");

    let result = runner.run_once(&request).await;
    assert!(result.success, "{result:?}");
    assert_eq!(result.output.as_deref(), Some("7"));
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn test_c_compile_error_fails_every_case() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("compile_error.c"), "c")
        .with_test_cases([TestCase::new("1 1", "2"), TestCase::new("2 2", "4")]);

    let suite = runner.run_tests(&request).await;
    assert!(!suite.success);
    assert!(suite.compilation_error.is_none());
    assert_eq!(suite.test_results.len(), 2);
    for case in &suite.test_results {
        let error = case.error.as_deref().expect("compiler output expected");
        assert!(error.contains("undefined_symbol"), "{error}");
        assert!(case.actual_output.is_none());
    }
}

#[tokio::test]
async fn test_cpp_graded_run() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("sum.cpp"), "cpp").with_test_cases([
        TestCase::new("1 2", "3"),
        TestCase::new("1000000000 1000000000", "2000000000"),
        TestCase::new("5 5", "11"),
    ]);

    let suite = runner.run_tests(&request).await;
    assert_eq!(suite.total_tests, 3);
    assert_eq!(suite.passed_tests, 2);
    assert!(!suite.success);
    assert_eq!(suite.test_results[2].actual_output.as_deref(), Some("10"));
}

#[tokio::test]
#[ignore = "requires a JDK"]
async fn test_java_public_class_name() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("Solution.java"), "java").with_input("20 22");

    let result = runner.run_once(&request).await;
    assert!(result.success, "{result:?}");
    assert_eq!(result.output.as_deref(), Some("42"));
}

#[tokio::test]
#[ignore = "requires a JDK"]
async fn test_java_default_main_class() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("Main.java"), "java");

    let result = runner.run_once(&request).await;
    assert!(result.success, "{result:?}");
    assert_eq!(result.output.as_deref(), Some("hello from main"));
}
