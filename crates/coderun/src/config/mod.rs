use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::language::{LanguageId, OutputFilter, Toolchains, UnsupportedLanguage};
use crate::types::ExecutionLimits;

pub mod language;
mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../coderun.example.toml");

/// Directory name used under the system temp dir when no scratch root is configured
const DEFAULT_SCRATCH_DIR: &str = "coderun";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for coderun
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding per-request working directories.
    ///
    /// Each request creates its own uniquely named directory below this root
    /// and removes it when the request finishes. Defaults to `coderun` under
    /// the system temp directory.
    #[serde(default)]
    pub scratch_root: Option<PathBuf>,

    /// Target framework written into the generated C# project file
    #[serde(default = "default_target_framework")]
    pub csharp_target_framework: String,

    /// Default limits applied to all executions.
    /// Overridden by limits set on the request.
    #[serde(default)]
    pub default_limits: ExecutionLimits,

    /// Host toolchain program names
    #[serde(default)]
    pub toolchains: Toolchains,

    /// Output filter overrides keyed by language ID
    #[serde(default)]
    pub output_filters: HashMap<LanguageId, OutputFilter>,
}

impl Config {
    /// Create a new config from the embedded example
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with built-in defaults and no overrides
    pub fn empty() -> Self {
        Self {
            scratch_root: None,
            csharp_target_framework: default_target_framework(),
            default_limits: ExecutionLimits::default(),
            toolchains: Toolchains::default(),
            output_filters: HashMap::new(),
        }
    }

    /// Get the scratch root directory
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_SCRATCH_DIR))
    }

    /// Get the configured output filter for a language, if one is set
    pub fn output_filter(&self, id: LanguageId) -> Option<OutputFilter> {
        self.output_filters.get(&id).copied()
    }

    /// Merge execution limits with defaults
    pub fn effective_limits(&self, overrides: Option<&ExecutionLimits>) -> ExecutionLimits {
        match overrides {
            Some(limits) => self.default_limits.with_overrides(limits),
            None => self.default_limits,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}

fn default_target_framework() -> String {
    "net8.0".to_owned()
}
