//! Graded runs against a list of test cases

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::runner::{Runner, Submission};
use crate::types::{ExecutionRequest, TestCase, TestCaseResult, TestSuiteResult, duration_ms};

/// Stage once, then run every case in order
///
/// A failing case never stops the run. Only a failure to prepare the code
/// aborts it, leaving `test_results` empty.
#[instrument(skip(runner, request), fields(language = %request.language, cases = request.cases().len()))]
pub(crate) async fn run_tests(runner: &Runner, request: &ExecutionRequest) -> TestSuiteResult {
    let cases = request.cases();

    let submission = match runner.prepare(request).await {
        Ok(submission) => submission,
        Err(err) => {
            warn!(%err, "test run aborted before any case ran");
            return TestSuiteResult::aborted(cases.len(), err.to_string());
        }
    };

    let mut results = Vec::with_capacity(cases.len());
    for (index, case) in cases.iter().enumerate() {
        let result = run_case(&submission, case).await;
        debug!(
            index,
            passed = result.passed,
            elapsed_ms = result.execution_time_ms,
            "test case finished"
        );
        results.push(result);
    }
    submission.cleanup();

    let suite = TestSuiteResult::from_cases(cases.len(), results);
    info!(
        passed = suite.passed_tests,
        total = suite.total_tests,
        "test run complete"
    );
    suite
}

async fn run_case(submission: &Submission, case: &TestCase) -> TestCaseResult {
    let started = Instant::now();
    let mut result = TestCaseResult {
        input: case.input.clone(),
        expected_output: case.expected_output.clone(),
        ..Default::default()
    };

    match submission.execute(&case.input).await {
        Ok(output) => match output.failure() {
            Some(error) => result.error = Some(error),
            None => {
                let actual = submission.normalize(&output.stdout);
                result.passed = case.matches(&actual);
                result.actual_output = Some(actual);
            }
        },
        Err(err) => result.error = Some(err.to_string()),
    }

    result.execution_time_ms = duration_ms(started.elapsed());
    result
}
