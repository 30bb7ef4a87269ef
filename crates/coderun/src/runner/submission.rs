use tracing::instrument;

use crate::config::{LanguageId, OutputFilter};
use crate::process::{self, CommandPlan, ProcessError};
use crate::types::{ExecutionLimits, RawOutput};
use crate::workspace::StagedSource;

/// Staged code together with everything needed to run it
#[derive(Debug)]
pub struct Submission {
    language: LanguageId,
    staged: StagedSource,
    plan: CommandPlan,
    filter: OutputFilter,
    limits: ExecutionLimits,
}

impl Submission {
    pub(crate) fn new(
        language: LanguageId,
        staged: StagedSource,
        plan: CommandPlan,
        filter: OutputFilter,
        limits: ExecutionLimits,
    ) -> Self {
        Self {
            language,
            staged,
            plan,
            filter,
            limits,
        }
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn limits(&self) -> ExecutionLimits {
        self.limits
    }

    /// Build and run the code once with `input` on stdin
    #[instrument(skip(self, input), fields(language = %self.language))]
    pub async fn execute(&self, input: &str) -> Result<RawOutput, ProcessError> {
        process::execute(&self.plan, Some(input), self.limits.timeout()).await
    }

    /// Apply the language's output filter and trim
    pub fn normalize(&self, stdout: &str) -> String {
        self.filter.apply(stdout)
    }

    /// Remove the staged directory
    pub fn cleanup(self) {
        self.staged.cleanup();
    }
}
