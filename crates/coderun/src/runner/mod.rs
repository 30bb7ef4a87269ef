//! Code runner for coderun
//!
//! Provides the high-level APIs that stage submitted code, run it and turn
//! the captured output into results.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, instrument};

pub use crate::runner::submission::Submission;

mod harness;
mod interactive;
mod submission;

use crate::{
    config::{Config, LanguageId, UnsupportedLanguage},
    profile,
    types::{ExecutionRequest, SingleRunResult, TestSuiteResult},
    workspace::{self, StageError},
};

/// Errors that stop a request before its code runs
///
/// The message of this error is what callers see as `compilationError`.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedLanguage),

    #[error(transparent)]
    Stage(#[from] StageError),
}

/// High-level runner for code execution
///
/// Cheap to clone; independent requests may run concurrently on clones or on
/// a shared reference.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new runner with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a new runner with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run code against every test case of a request, in order
    ///
    /// Never fails: problems before any case runs are reported through
    /// [`TestSuiteResult::compilation_error`], problems running a case through
    /// that case's result.
    pub async fn run_tests(&self, request: &ExecutionRequest) -> TestSuiteResult {
        let started = Instant::now();
        harness::run_tests(self, request)
            .await
            .with_elapsed(started.elapsed())
    }

    /// Run code once with the request's input
    pub async fn run_once(&self, request: &ExecutionRequest) -> SingleRunResult {
        interactive::run_once(self, request).await
    }

    /// Resolve the language and stage the code of a request
    ///
    /// The returned submission can be executed any number of times and should
    /// be cleaned up afterwards.
    #[instrument(skip(self, request), fields(language = %request.language))]
    pub async fn prepare(&self, request: &ExecutionRequest) -> Result<Submission, RunnerError> {
        let language: LanguageId = request.language.parse()?;
        let profile = profile::resolve(language, &self.config);

        let limits = self.config.effective_limits(Some(&request.limits()));
        if let Some(memory_limit_mb) = limits.memory_limit_mb {
            debug!(memory_limit_mb, "memory limit is recorded but not enforced");
        }

        let staged =
            workspace::stage(profile.as_ref(), &self.config.scratch_root(), &request.code).await?;
        let plan = profile.command_plan(&staged);
        let filter = self
            .config
            .output_filter(language)
            .unwrap_or_else(|| profile.output_filter());

        debug!(?filter, timeout = ?limits.timeout(), "submission prepared");
        Ok(Submission::new(language, staged, plan, filter, limits))
    }
}

/// Runner whose `python` toolchain is `sh`, so shell scripts stand in for
/// submitted programs
#[cfg(test)]
pub(crate) fn shell_runner(scratch_root: &std::path::Path) -> Runner {
    let mut config = Config::empty();
    config.scratch_root = Some(scratch_root.to_path_buf());
    config.toolchains.python = "sh".to_owned();
    Runner::new(config)
}
