use coderun::types::{ExecutionRequest, TestCase};

use super::{fixture_source, test_runner};

#[tokio::test]
#[ignore = "requires the .NET SDK"]
async fn test_csharp_program() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("program.cs"), "csharp")
        .with_timeout_seconds(60)
        .with_input("19 23");

    let result = runner.run_once(&request).await;
    assert!(result.success, "{result:?}");
    assert_eq!(result.output.as_deref(), Some("42"));
}

#[tokio::test]
#[ignore = "requires the .NET SDK"]
async fn test_csharp_snippet_is_wrapped() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new(fixture_source("snippet.cs"), "csharp")
        .with_timeout_seconds(60)
        .with_test_cases([TestCase::new("a b c", "3")]);

    let suite = runner.run_tests(&request).await;
    assert!(suite.success, "{suite:?}");
}

#[tokio::test]
#[ignore = "requires the .NET SDK"]
async fn test_csharp_build_error_is_reported() {
    let (runner, _scratch) = test_runner();
    let request = ExecutionRequest::new("int x = ;", "csharp").with_timeout_seconds(60);

    let result = runner.run_once(&request).await;
    assert!(!result.success);
    let error = result.error.expect("build diagnostics expected");
    assert!(error.contains("error CS"), "{error}");
}
