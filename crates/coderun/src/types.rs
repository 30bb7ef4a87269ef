use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error text reported for any invocation that loses the timeout race
pub const TIMEOUT_MESSAGE: &str = "Execution timed out";

/// Limits applied to a single request
///
/// Values are optional so that request-level settings can be layered over the
/// configured defaults with [`with_overrides`](Self::with_overrides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLimits {
    /// Wall clock time limit in seconds, covering build and run steps together
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Declared memory limit in megabytes
    ///
    /// Accepted and carried through for reporting only. It is never applied to
    /// the child process.
    #[serde(default)]
    pub memory_limit_mb: Option<u64>,
}

impl ExecutionLimits {
    /// Timeout used when neither the request nor the configuration sets one
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
    /// Memory limit used when neither the request nor the configuration sets one
    pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 256;

    /// Create limits with both fields unset
    pub fn unset() -> Self {
        Self {
            timeout_seconds: None,
            memory_limit_mb: None,
        }
    }

    /// Set the timeout in seconds
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set the declared memory limit in megabytes
    pub fn with_memory_limit_mb(mut self, mb: u64) -> Self {
        self.memory_limit_mb = Some(mb);
        self
    }

    /// Apply overrides from another ExecutionLimits, preferring values from `overrides`
    pub fn with_overrides(&self, overrides: &ExecutionLimits) -> ExecutionLimits {
        ExecutionLimits {
            timeout_seconds: overrides.timeout_seconds.or(self.timeout_seconds),
            memory_limit_mb: overrides.memory_limit_mb.or(self.memory_limit_mb),
        }
    }

    /// The wall clock timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_seconds
                .unwrap_or(Self::DEFAULT_TIMEOUT_SECONDS),
        )
    }
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            timeout_seconds: Some(Self::DEFAULT_TIMEOUT_SECONDS),
            memory_limit_mb: Some(Self::DEFAULT_MEMORY_LIMIT_MB),
        }
    }
}

/// Request-shape errors, rejected before a request reaches the runner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Code cannot be empty")]
    EmptyCode,

    #[error("Language cannot be empty")]
    EmptyLanguage,

    #[error("At least one test case is required")]
    NoTestCases,

    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

/// A request to run submitted code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    /// Submitted source code
    pub code: String,

    /// Language identifier (case-insensitive)
    pub language: String,

    /// Ad hoc input for a single run
    #[serde(default, alias = "userInput")]
    pub input: Option<String>,

    /// Test cases for a graded run, in order
    #[serde(default)]
    pub test_cases: Option<Vec<TestCase>>,

    /// Wall clock timeout in seconds
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Declared memory limit in megabytes (never enforced)
    #[serde(default, rename = "memoryLimitMB")]
    pub memory_limit_mb: Option<u64>,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_test_cases(mut self, cases: impl IntoIterator<Item = TestCase>) -> Self {
        self.test_cases = Some(cases.into_iter().collect());
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn with_memory_limit_mb(mut self, mb: u64) -> Self {
        self.memory_limit_mb = Some(mb);
        self
    }

    /// Limits explicitly set on this request
    pub fn limits(&self) -> ExecutionLimits {
        ExecutionLimits {
            timeout_seconds: self.timeout_seconds,
            memory_limit_mb: self.memory_limit_mb,
        }
    }

    /// Test cases of this request, empty when none were given
    pub fn cases(&self) -> &[TestCase] {
        self.test_cases.as_deref().unwrap_or_default()
    }

    /// Check the fields every request needs
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyCode);
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::EmptyLanguage);
        }
        if self.timeout_seconds == Some(0) {
            return Err(ValidationError::ZeroTimeout);
        }
        Ok(())
    }

    /// Check a request meant for a graded run
    pub fn validate_for_tests(&self) -> Result<(), ValidationError> {
        self.validate()?;
        if self.cases().is_empty() {
            return Err(ValidationError::NoTestCases);
        }
        Ok(())
    }
}

/// An input paired with the output it should produce
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub input: String,

    #[serde(default)]
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }

    /// Compare an actual output against the expectation
    ///
    /// Both sides are trimmed at their ends only. Internal whitespace and case
    /// are significant.
    pub fn matches(&self, actual: &str) -> bool {
        actual.trim() == self.expected_output.trim()
    }
}

/// Verdict for one test case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub input: String,
    pub expected_output: String,
    pub actual_output: Option<String>,
    pub passed: bool,
    pub error: Option<String>,
    pub execution_time_ms: u64,
}

/// Aggregate verdict for a graded run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuiteResult {
    pub success: bool,
    pub test_results: Vec<TestCaseResult>,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub compilation_error: Option<String>,
    pub total_execution_time_ms: u64,
}

impl TestSuiteResult {
    /// Build a suite result from completed cases
    pub fn from_cases(total_tests: usize, test_results: Vec<TestCaseResult>) -> Self {
        let passed_tests = test_results.iter().filter(|r| r.passed).count();
        Self {
            success: passed_tests == total_tests,
            test_results,
            total_tests,
            passed_tests,
            compilation_error: None,
            total_execution_time_ms: 0,
        }
    }

    /// Build a suite result for a run that stopped before or between cases
    pub fn aborted(total_tests: usize, error: impl Into<String>) -> Self {
        Self {
            success: false,
            test_results: Vec::new(),
            total_tests,
            passed_tests: 0,
            compilation_error: Some(error.into()),
            total_execution_time_ms: 0,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.total_execution_time_ms = duration_ms(elapsed);
        self
    }
}

/// Result of a single ad hoc run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleRunResult {
    pub success: bool,
    pub output: Option<String>,
    pub error: Option<String>,
    pub compilation_error: Option<String>,
}

impl SingleRunResult {
    pub fn compilation_failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: None,
            compilation_error: Some(error.into()),
        }
    }
}

/// Captured result of one process runner invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Standard output of every captured step, in order
    pub stdout: String,

    /// Standard error of every step, in order
    pub stderr: String,

    /// Exit code of the last step that ran, if it exited normally
    pub exit_code: Option<i32>,

    /// Whether the deadline elapsed before the plan finished
    pub timed_out: bool,

    /// Wall clock time spent
    pub elapsed: Duration,
}

impl RawOutput {
    /// Output of a plan that was killed at its deadline
    pub fn timed_out(elapsed: Duration) -> Self {
        Self {
            timed_out: true,
            elapsed,
            ..Default::default()
        }
    }

    /// Check if the plan ran to completion with exit code 0 and no stderr
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// Error text for a failed invocation, `None` if it succeeded
    ///
    /// A crash and intentional error output are treated alike: any stderr text
    /// is a failure and is reported verbatim.
    pub fn failure(&self) -> Option<String> {
        if self.timed_out {
            return Some(TIMEOUT_MESSAGE.to_string());
        }
        if !self.stderr.is_empty() {
            return Some(self.stderr.clone());
        }
        match self.exit_code {
            Some(0) => None,
            Some(code) => Some(format!("Process exited with code {code}")),
            None => Some("Process was terminated by a signal".to_string()),
        }
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
