//! Language profiles
//!
//! A profile knows how one language is laid out on disk and which commands
//! build and run it. Profiles are resolved from a [`LanguageId`] and the
//! toolchain names in the [`Config`].

use std::fmt::Debug;

use uuid::Uuid;

pub use crate::profile::dotnet::DotNet;
pub use crate::profile::interpreted::Interpreted;
pub use crate::profile::java::Java;
pub use crate::profile::native::Native;

mod dotnet;
mod interpreted;
mod java;
mod native;

use crate::config::{Config, LanguageId, OutputFilter};
use crate::process::CommandPlan;
use crate::workspace::StagedSource;

/// A file to be written into a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Files a profile wants on disk for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    /// The submitted code, possibly rewritten
    pub source: SourceFile,
    /// Supporting files such as project descriptors
    pub scaffold: Vec<SourceFile>,
}

impl StagePlan {
    pub fn source_only(source: SourceFile) -> Self {
        Self {
            source,
            scaffold: Vec::new(),
        }
    }
}

/// How a language is staged, built and run
pub trait LanguageProfile: Debug + Send + Sync {
    /// Language this profile handles
    fn id(&self) -> LanguageId;

    /// Source file extension, without the dot
    fn extension(&self) -> &'static str;

    /// Decide file names and contents for submitted code
    fn stage(&self, code: &str) -> StagePlan;

    /// Commands that build and run a staged source
    ///
    /// Every step runs with the staged directory as its working directory.
    fn command_plan(&self, staged: &StagedSource) -> CommandPlan;

    /// Post-processing for the program's stdout
    fn output_filter(&self) -> OutputFilter {
        OutputFilter::Verbatim
    }
}

/// Get the profile for a language
///
/// Toolchain program names and the .NET target framework come from `config`.
/// Output filter overrides are applied by the caller.
pub fn resolve(id: LanguageId, config: &Config) -> Box<dyn LanguageProfile> {
    let toolchains = &config.toolchains;
    match id {
        LanguageId::Python => Box::new(Interpreted::new(id, "py", &toolchains.python)),
        LanguageId::JavaScript => Box::new(Interpreted::new(id, "js", &toolchains.node)),
        LanguageId::C => Box::new(Native::new(id, "c", &toolchains.gcc)),
        LanguageId::Cpp => Box::new(Native::new(id, "cpp", &toolchains.gxx)),
        LanguageId::Java => Box::new(Java::new(&toolchains.javac, &toolchains.java)),
        LanguageId::CSharp => Box::new(DotNet::new(
            &toolchains.dotnet,
            &config.csharp_target_framework,
        )),
    }
}

/// Unique source file name for languages with no naming rule
pub(crate) fn unique_source_name(extension: &str) -> String {
    format!("code_{}.{extension}", Uuid::new_v4().simple())
}
