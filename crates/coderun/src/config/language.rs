use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Error for a language identifier outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageId {
    Python,
    Java,
    C,
    Cpp,
    CSharp,
    JavaScript,
}

impl LanguageId {
    /// Every supported language, in listing order
    pub const ALL: [LanguageId; 6] = [
        LanguageId::Python,
        LanguageId::Java,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::CSharp,
        LanguageId::JavaScript,
    ];

    /// Canonical lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::Python => "python",
            LanguageId::Java => "java",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::CSharp => "csharp",
            LanguageId::JavaScript => "javascript",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::Python => "Python 3",
            LanguageId::Java => "Java",
            LanguageId::C => "C (GCC)",
            LanguageId::Cpp => "C++ (G++)",
            LanguageId::CSharp => "C# (.NET)",
            LanguageId::JavaScript => "JavaScript (Node.js)",
        }
    }
}

impl FromStr for LanguageId {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LanguageId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnsupportedLanguage(s.to_owned()))
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LanguageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LanguageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(&s), &"a supported language identifier")
        })
    }
}

/// Post-processing applied to captured stdout before it is trimmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFilter {
    /// Keep stdout as captured
    #[default]
    Verbatim,

    /// Keep only the last non-empty line
    ///
    /// For toolchains that print banner or diagnostic text on stdout ahead of
    /// the program's own output. Legitimate multi-line output is reduced to its
    /// final line.
    LastNonEmptyLine,
}

impl OutputFilter {
    /// Apply the filter and trim the result
    pub fn apply(&self, stdout: &str) -> String {
        match self {
            OutputFilter::Verbatim => stdout.trim().to_owned(),
            OutputFilter::LastNonEmptyLine => stdout
                .split(['\n', '\r'])
                .filter(|line| !line.is_empty())
                .last()
                .unwrap_or_default()
                .trim()
                .to_owned(),
        }
    }
}

/// Program names of the host toolchains
///
/// Each entry is looked up on the host's PATH when the command runs. Nothing
/// is installed or verified ahead of time; a missing toolchain surfaces as an
/// execution failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toolchains {
    pub python: String,
    pub node: String,
    pub gcc: String,
    pub gxx: String,
    pub javac: String,
    pub java: String,
    pub dotnet: String,
}

impl Toolchains {
    /// Name/program pairs, for listing and validation
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("python", self.python.as_str()),
            ("node", self.node.as_str()),
            ("gcc", self.gcc.as_str()),
            ("gxx", self.gxx.as_str()),
            ("javac", self.javac.as_str()),
            ("java", self.java.as_str()),
            ("dotnet", self.dotnet.as_str()),
        ]
    }

    /// Programs a language needs, in the order they run
    pub fn for_language(&self, id: LanguageId) -> Vec<&str> {
        match id {
            LanguageId::Python => vec![self.python.as_str()],
            LanguageId::JavaScript => vec![self.node.as_str()],
            LanguageId::C => vec![self.gcc.as_str()],
            LanguageId::Cpp => vec![self.gxx.as_str()],
            LanguageId::Java => vec![self.javac.as_str(), self.java.as_str()],
            LanguageId::CSharp => vec![self.dotnet.as_str()],
        }
    }
}

impl Default for Toolchains {
    fn default() -> Self {
        Self {
            python: "python3".to_owned(),
            node: "node".to_owned(),
            gcc: "gcc".to_owned(),
            gxx: "g++".to_owned(),
            javac: "javac".to_owned(),
            java: "java".to_owned(),
            dotnet: "dotnet".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_id_parses_canonical_names() {
        assert_eq!("python".parse::<LanguageId>(), Ok(LanguageId::Python));
        assert_eq!("java".parse::<LanguageId>(), Ok(LanguageId::Java));
        assert_eq!("c".parse::<LanguageId>(), Ok(LanguageId::C));
        assert_eq!("cpp".parse::<LanguageId>(), Ok(LanguageId::Cpp));
        assert_eq!("csharp".parse::<LanguageId>(), Ok(LanguageId::CSharp));
        assert_eq!("javascript".parse::<LanguageId>(), Ok(LanguageId::JavaScript));
    }

    #[test]
    fn language_id_is_case_insensitive() {
        assert_eq!("PyThOn".parse::<LanguageId>(), Ok(LanguageId::Python));
        assert_eq!("CSharp".parse::<LanguageId>(), Ok(LanguageId::CSharp));
        assert_eq!("CPP".parse::<LanguageId>(), Ok(LanguageId::Cpp));
    }

    #[test]
    fn language_id_rejects_unknown() {
        let result = "ruby".parse::<LanguageId>();
        assert_eq!(result, Err(UnsupportedLanguage("ruby".to_owned())));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unsupported language: ruby"
        );
    }

    #[test]
    fn language_id_rejects_empty() {
        assert!("".parse::<LanguageId>().is_err());
    }

    #[test]
    fn language_id_display_round_trips() {
        for id in LanguageId::ALL {
            assert_eq!(id.to_string().parse::<LanguageId>(), Ok(id));
        }
    }

    #[test]
    fn output_filter_verbatim_trims() {
        assert_eq!(OutputFilter::Verbatim.apply("  a\nb \n"), "a\nb");
    }

    #[test]
    fn output_filter_last_line_skips_banner() {
        let stdout = "Welcome to .NET!\r\n\r\nSome banner\n42\n\n";
        assert_eq!(OutputFilter::LastNonEmptyLine.apply(stdout), "42");
    }

    #[test]
    fn output_filter_last_line_drops_earlier_output() {
        assert_eq!(OutputFilter::LastNonEmptyLine.apply("1\n2\n3"), "3");
    }

    #[test]
    fn output_filter_last_line_empty() {
        assert_eq!(OutputFilter::LastNonEmptyLine.apply(""), "");
        assert_eq!(OutputFilter::LastNonEmptyLine.apply("\n\r\n"), "");
    }

    #[test]
    fn toolchains_for_java_needs_compiler_and_runtime() {
        let toolchains = Toolchains::default();
        assert_eq!(
            toolchains.for_language(LanguageId::Java),
            vec!["javac", "java"]
        );
    }
}
