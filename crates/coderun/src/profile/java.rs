use std::sync::OnceLock;

use regex::Regex;

use crate::config::LanguageId;
use crate::process::{CommandPlan, CommandStep};
use crate::profile::{LanguageProfile, SourceFile, StagePlan};
use crate::workspace::StagedSource;

/// Class name used when the source declares no public type
const DEFAULT_CLASS: &str = "Main";

/// `javac` requires a public top-level type to live in a file of the same name
fn public_type_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"\bpublic\s+(?:(?:final|abstract|static|sealed|non-sealed|strictfp)\s+)*(?:class|interface|enum|record)\s+([A-Za-z_$][A-Za-z0-9_$]*)",
            )
            .ok()
        })
        .as_ref()
}

/// Name of the first public type declared in `code`
pub(crate) fn public_type_name(code: &str) -> Option<&str> {
    public_type_pattern()?
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str())
}

/// Java: compiled with `javac`, run by class name with the workspace as class path
#[derive(Debug, Clone)]
pub struct Java {
    javac: String,
    java: String,
}

impl Java {
    pub fn new(javac: &str, java: &str) -> Self {
        Self {
            javac: javac.to_owned(),
            java: java.to_owned(),
        }
    }
}

impl LanguageProfile for Java {
    fn id(&self) -> LanguageId {
        LanguageId::Java
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn stage(&self, code: &str) -> StagePlan {
        let class = public_type_name(code).unwrap_or(DEFAULT_CLASS);
        StagePlan::source_only(SourceFile::new(
            format!("{class}.{}", self.extension()),
            code,
        ))
    }

    fn command_plan(&self, staged: &StagedSource) -> CommandPlan {
        let compile = CommandStep::new(&self.javac)
            .path_arg(&staged.source_path())
            .working_dir(staged.dir());
        let run = CommandStep::new(&self.java)
            .arg("-cp")
            .path_arg(staged.dir())
            .arg(staged.source_stem())
            .working_dir(staged.dir());

        CommandPlan::new(run).build_step(compile)
    }
}
