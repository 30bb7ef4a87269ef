use coderun::config::{Config, ConfigError, LanguageId, OutputFilter};
use coderun::EXAMPLE_CONFIG;

use super::FIXTURES_PATH;

#[test]
fn test_load_valid_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_full.toml");
    let config = Config::from_file(&path).expect("Failed to load config");

    assert_eq!(config.default_limits.timeout_seconds, Some(10));
    assert_eq!(config.default_limits.memory_limit_mb, Some(512));
    assert_eq!(config.toolchains.gxx, "g++");
    assert_eq!(
        config.output_filter(LanguageId::CSharp),
        Some(OutputFilter::LastNonEmptyLine)
    );
    assert_eq!(
        config.output_filter(LanguageId::JavaScript),
        Some(OutputFilter::Verbatim)
    );
}

#[test]
fn test_load_minimal_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_minimal.toml");
    let config = Config::from_file(&path).expect("Failed to load config");

    assert_eq!(config.default_limits.timeout_seconds, Some(3));
    assert_eq!(config.toolchains.python, "python3");
    assert_eq!(config.csharp_target_framework, "net8.0");
}

#[test]
fn test_load_invalid_empty_toolchain() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_empty_toolchain.toml");
    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_invalid_zero_timeout() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_zero_timeout.toml");
    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_invalid_unknown_language() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_unknown_language.toml");
    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_invalid_syntax() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_syntax.toml");
    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_example_config_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coderun.toml");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();

    let from_file = Config::from_file(&path).expect("Failed to load example config");
    let embedded = Config::default();
    assert_eq!(from_file.toolchains, embedded.toolchains);
    assert_eq!(from_file.default_limits, embedded.default_limits);
}
