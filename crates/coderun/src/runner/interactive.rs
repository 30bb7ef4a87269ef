//! Single runs with ad hoc input

use tracing::{debug, instrument};

use crate::runner::Runner;
use crate::types::{ExecutionRequest, SingleRunResult};

/// Stage, run once with the request's input and clean up
///
/// Output is returned even when the program fails, unless it timed out.
#[instrument(skip(runner, request), fields(language = %request.language))]
pub(crate) async fn run_once(runner: &Runner, request: &ExecutionRequest) -> SingleRunResult {
    let submission = match runner.prepare(request).await {
        Ok(submission) => submission,
        Err(err) => return SingleRunResult::compilation_failed(err.to_string()),
    };

    let input = request.input.as_deref().unwrap_or_default();
    let result = match submission.execute(input).await {
        Ok(output) => match output.failure() {
            None => SingleRunResult {
                success: true,
                output: Some(submission.normalize(&output.stdout)),
                ..Default::default()
            },
            Some(error) => SingleRunResult {
                success: false,
                output: (!output.timed_out).then(|| submission.normalize(&output.stdout)),
                error: Some(error),
                compilation_error: None,
            },
        },
        Err(err) => SingleRunResult {
            error: Some(err.to_string()),
            ..Default::default()
        },
    };
    submission.cleanup();

    debug!(success = result.success, "run complete");
    result
}
