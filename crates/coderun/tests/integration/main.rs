//! Integration tests for coderun
//!
//! These tests run submissions with the real toolchains (python3, node, gcc,
//! g++, javac/java, dotnet). Run with:
//!    cargo test -p coderun --features integration-tests
//!
//! Tests for toolchains that are often missing are marked `#[ignore]`. To
//! include them:
//!    cargo test -p coderun --features integration-tests -- --include-ignored

#![cfg(feature = "integration-tests")]

use std::fs;

use coderun::config::Config;
use coderun::runner::Runner;
use tempfile::TempDir;

mod compiled;
mod config_loading;
mod dotnet;
mod interpreted;
mod test_suites;

const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Helper to get fixture file content
pub(crate) fn fixture_source(name: &str) -> String {
    let path = format!("{FIXTURES_PATH}/sources/{name}");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {path}: {e}"))
}

/// Create a runner with default toolchains and a private scratch root
///
/// The returned directory must outlive the runner.
pub(crate) fn test_runner() -> (Runner, TempDir) {
    let scratch = TempDir::new().expect("Failed to create scratch root");
    let mut config = Config::default();
    config.scratch_root = Some(scratch.path().to_path_buf());
    // Cold JVM and compiler starts are slow on CI machines
    config.default_limits.timeout_seconds = Some(20);
    (Runner::new(config), scratch)
}

/// Whether the scratch root is empty, i.e. every workspace was removed
pub(crate) fn scratch_is_empty(scratch: &TempDir) -> bool {
    fs::read_dir(scratch.path())
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}
