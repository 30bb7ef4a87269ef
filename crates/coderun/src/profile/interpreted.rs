use crate::config::LanguageId;
use crate::process::{CommandPlan, CommandStep};
use crate::profile::{LanguageProfile, SourceFile, StagePlan, unique_source_name};
use crate::workspace::StagedSource;

/// Languages run directly from source by an interpreter
#[derive(Debug, Clone)]
pub struct Interpreted {
    id: LanguageId,
    extension: &'static str,
    interpreter: String,
}

impl Interpreted {
    pub fn new(id: LanguageId, extension: &'static str, interpreter: &str) -> Self {
        Self {
            id,
            extension,
            interpreter: interpreter.to_owned(),
        }
    }
}

impl LanguageProfile for Interpreted {
    fn id(&self) -> LanguageId {
        self.id
    }

    fn extension(&self) -> &'static str {
        self.extension
    }

    fn stage(&self, code: &str) -> StagePlan {
        StagePlan::source_only(SourceFile::new(unique_source_name(self.extension), code))
    }

    fn command_plan(&self, staged: &StagedSource) -> CommandPlan {
        CommandPlan::new(
            CommandStep::new(&self.interpreter)
                .path_arg(&staged.source_path())
                .working_dir(staged.dir()),
        )
    }
}
