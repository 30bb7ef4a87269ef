//! Command plans for building and running staged code
//!
//! A plan is an ordered list of build steps followed by one run step. Each
//! step is a program and an argument list; nothing is re-parsed by a shell.
//! Arguments are kept as OS strings so paths reach the program byte for byte.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tokio::process::Command;

/// One program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    program: OsString,
    args: Vec<OsString>,
    env: BTreeMap<String, String>,
    working_dir: Option<PathBuf>,
}

impl CommandStep {
    /// Create a step running `program` with no arguments
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            working_dir: None,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    /// Append several arguments
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Get the program name
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Program name for messages, with invalid UTF-8 replaced
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Get the working directory, if set
    pub fn dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Get the environment overrides
    pub fn envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }

    /// Build a tokio command for this step
    ///
    /// Stdio is left to the caller.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).envs(&self.env);
        if let Some(ref dir) = self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

/// Build steps followed by the step that runs the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    build: Vec<CommandStep>,
    run: CommandStep,
}

impl CommandPlan {
    /// Create a plan with only a run step
    pub fn new(run: CommandStep) -> Self {
        Self {
            build: Vec::new(),
            run,
        }
    }

    /// Add a build step, run before the run step and after earlier build steps
    pub fn build_step(mut self, step: CommandStep) -> Self {
        self.build.push(step);
        self
    }

    pub fn build_steps(&self) -> &[CommandStep] {
        &self.build
    }

    pub fn run_step(&self) -> &CommandStep {
        &self.run
    }

    /// Every step in execution order
    pub fn steps(&self) -> impl Iterator<Item = &CommandStep> {
        self.build.iter().chain(std::iter::once(&self.run))
    }

    /// Number of steps including the run step
    pub fn len(&self) -> usize {
        self.build.len() + 1
    }

    /// Plans always hold a run step
    pub fn is_empty(&self) -> bool {
        false
    }
}
