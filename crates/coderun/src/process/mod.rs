//! Host process execution
//!
//! Builds and runs staged code as child processes of the current process.
//! There is no isolation layer: programs run with the privileges of the
//! caller, in a per-request working directory.

use thiserror::Error;

pub use crate::process::command::{CommandPlan, CommandStep};
pub use crate::process::exec::{execute, stdin_payload};

mod command;
mod exec;

/// Errors that prevent a command plan from producing output
///
/// A program that fails, crashes or times out is not an error here; that is
/// reported through [`RawOutput`](crate::types::RawOutput).
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("empty command: no program to run")]
    EmptyCommand,

    #[error("failed to start {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
