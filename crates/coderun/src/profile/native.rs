use crate::config::LanguageId;
use crate::process::{CommandPlan, CommandStep};
use crate::profile::{LanguageProfile, SourceFile, StagePlan, unique_source_name};
use crate::workspace::StagedSource;

/// Name of the executable produced by the compiler
const EXECUTABLE_NAME: &str = "program";

/// Languages compiled to a native executable (C, C++)
#[derive(Debug, Clone)]
pub struct Native {
    id: LanguageId,
    extension: &'static str,
    compiler: String,
}

impl Native {
    pub fn new(id: LanguageId, extension: &'static str, compiler: &str) -> Self {
        Self {
            id,
            extension,
            compiler: compiler.to_owned(),
        }
    }
}

impl LanguageProfile for Native {
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
        let executable = staged.dir().join(EXECUTABLE_NAME);
        let compile = CommandStep::new(&self.compiler)
            .path_arg(&staged.source_path())
            .arg("-o")
            .path_arg(&executable)
            .working_dir(staged.dir());
        let run = CommandStep::new(executable.as_os_str()).working_dir(staged.dir());

        CommandPlan::new(run).build_step(compile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace;

    #[tokio::test]
    async fn plan_compiles_then_runs_executable() {
        let root = tempfile::tempdir().unwrap();
        let profile = Native::new(LanguageId::Cpp, "cpp", "g++");
        let staged = workspace::stage(&profile, root.path(), "int main() {}")
            .await
            .unwrap();
        assert!(staged.source_name().ends_with(".cpp"));

        let plan = profile.command_plan(&staged);
        let source = staged.source_path();
        let executable = staged.dir().join("program");
        assert_eq!(plan.build_steps().len(), 1);
        assert_eq!(
            plan.build_steps()[0].argv(),
            vec![
                "g++",
                source.to_str().unwrap(),
                "-o",
                executable.to_str().unwrap()
            ]
        );
        assert_eq!(plan.run_step().argv(), vec![executable.to_str().unwrap()]);
    }

    #[test]
    fn compiler_comes_from_toolchain() {
        let profile = Native::new(LanguageId::C, "c", "clang");
        assert_eq!(profile.compiler, "clang");
        assert_eq!(profile.extension(), "c");
    }
}
