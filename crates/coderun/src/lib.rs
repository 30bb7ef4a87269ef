//! A library for running and grading submitted programs.
//!
//! coderun takes source code in one of several languages, stages it in a
//! per-request scratch directory, builds and runs it with the host's
//! toolchains, and reports captured output or per-test-case verdicts.
//!
//! # Features
//!
//! - **Multi-language** - Python, JavaScript, C, C++, Java and C#.
//! - **Graded runs** - Sequential test cases with trimmed exact-match comparison.
//! - **Wall clock timeouts** - Process groups are killed when the deadline passes.
//! - **TOML configuration** - Toolchain names, default limits and output filters.
//!
//! Code runs as an ordinary child process. There is no sandboxing, and memory
//! limits are accepted but not enforced.

pub use config::{Config, ConfigError, EXAMPLE_CONFIG, LanguageId, OutputFilter};
pub use process::{CommandPlan, CommandStep, ProcessError};
pub use profile::LanguageProfile;
pub use runner::{Runner, RunnerError, Submission};
pub use types::{
    ExecutionLimits, ExecutionRequest, RawOutput, SingleRunResult, TIMEOUT_MESSAGE, TestCase,
    TestCaseResult, TestSuiteResult, ValidationError,
};
pub use workspace::{StageError, StagedSource, Workspace};

pub mod config;
pub mod process;
pub mod profile;
pub mod runner;
pub mod types;
pub mod workspace;
