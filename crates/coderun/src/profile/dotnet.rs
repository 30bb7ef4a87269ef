use std::sync::OnceLock;

use regex::Regex;

use crate::config::{LanguageId, OutputFilter};
use crate::process::{CommandPlan, CommandStep};
use crate::profile::{LanguageProfile, SourceFile, StagePlan};
use crate::workspace::StagedSource;

const SOURCE_NAME: &str = "Program.cs";
const PROJECT_NAME: &str = "Submission.csproj";

/// `Console.ReadLine()` returns null at end of input
const UNGUARDED_SPLIT: &str = "Console.ReadLine().Split()";
const GUARDED_SPLIT: &str = "Console.ReadLine()?.Split() ?? Array.Empty<string>()";

/// Environment that keeps the SDK from printing first-run and telemetry notices
const QUIET_ENV: [(&str, &str); 3] = [
    ("DOTNET_NOLOGO", "1"),
    ("DOTNET_CLI_TELEMETRY_OPTOUT", "1"),
    ("DOTNET_SKIP_FIRST_TIME_EXPERIENCE", "1"),
];

fn type_declaration_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"\b(?:class|struct|record|interface|enum|namespace)\s+[@A-Za-z_]").ok()
        })
        .as_ref()
}

/// Blank out comments and string or char literals, keeping line structure
fn strip_comments_and_literals(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            // Verbatim string: `""` is an escaped quote, backslashes are literal
            '@' if chars.peek() == Some(&'"') => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '"' {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
                out.push(' ');
            }
            '"' | '\'' => {
                while let Some(next) = chars.next() {
                    if next == '\\' {
                        chars.next();
                    } else if next == c || next == '\n' {
                        break;
                    }
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Whether `code` declares a type or namespace of its own
///
/// Keywords inside comments and string literals do not count.
fn declares_type(code: &str) -> bool {
    let code = strip_comments_and_literals(code);
    type_declaration_pattern().is_some_and(|re| re.is_match(&code))
}

/// Project file for a console program
fn project_file(target_framework: &str) -> String {
    format!(
        r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <TargetFramework>{target_framework}</TargetFramework>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <SuppressNETCoreSdkPreviewMessage>true</SuppressNETCoreSdkPreviewMessage>
    <NoWarn>$(NoWarn);CS8602</NoWarn>
  </PropertyGroup>

</Project>
"#
    )
}

/// Put a bare statement snippet inside a `Program.Main` entry point
///
/// Leading `using` directives stay at file scope.
fn wrap_in_entry_point(code: &str) -> String {
    let mut usings = String::new();
    let mut body = String::new();
    let mut in_header = true;

    for line in code.lines() {
        let trimmed = line.trim();
        if in_header && trimmed.starts_with("using ") && trimmed.ends_with(';') && !trimmed.contains('(') {
            usings.push_str(trimmed);
            usings.push('\n');
            continue;
        }
        if !trimmed.is_empty() {
            in_header = false;
        }
        if !in_header {
            body.push_str("        ");
            body.push_str(line);
            body.push('\n');
        }
    }

    let mut program = usings;
    if !program.is_empty() {
        program.push('\n');
    }
    program.push_str("public static class Program\n{\n    public static void Main(string[] args)\n    {\n");
    program.push_str(&body);
    program.push_str("    }\n}\n");
    program
}

/// Rewrite submitted C# into a compilable `Program.cs`
pub(crate) fn prepare_source(code: &str) -> String {
    let code = code.replace(UNGUARDED_SPLIT, GUARDED_SPLIT);
    if declares_type(&code) {
        code
    } else {
        wrap_in_entry_point(&code)
    }
}

/// C#: a generated SDK project built and run with `dotnet`
#[derive(Debug, Clone)]
pub struct DotNet {
    dotnet: String,
    target_framework: String,
}

impl DotNet {
    pub fn new(dotnet: &str, target_framework: &str) -> Self {
        Self {
            dotnet: dotnet.to_owned(),
            target_framework: target_framework.to_owned(),
        }
    }

    fn step(&self, staged: &StagedSource) -> CommandStep {
        QUIET_ENV
            .iter()
            .fold(CommandStep::new(&self.dotnet), |step, (key, value)| {
                step.env(*key, *value)
            })
            .working_dir(staged.dir())
    }
}

impl LanguageProfile for DotNet {
    fn id(&self) -> LanguageId {
        LanguageId::CSharp
    }

    fn extension(&self) -> &'static str {
        "cs"
    }

    fn stage(&self, code: &str) -> StagePlan {
        StagePlan {
            source: SourceFile::new(SOURCE_NAME, prepare_source(code)),
            scaffold: vec![SourceFile::new(
                PROJECT_NAME,
                project_file(&self.target_framework),
            )],
        }
    }

    fn command_plan(&self, staged: &StagedSource) -> CommandPlan {
        let build = self
            .step(staged)
            .args(["build", "--nologo", "--verbosity", "quiet"]);
        let run = self.step(staged).args(["run", "--no-build", "--nologo"]);

        CommandPlan::new(run).build_step(build)
    }

    fn output_filter(&self) -> OutputFilter {
        OutputFilter::LastNonEmptyLine
    }
}
