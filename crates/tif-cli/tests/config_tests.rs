//! Configuration precedence tests

use clap::Parser;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use tif_cli::cli::{Cli, LogLevel};
use tif_cli::config::CliConfig;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["tif", "vault"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn clear_env() {
    std::env::set_var("TIF_TEST_MODE", "1");
    std::env::remove_var("TIF_INCLUDE_HIDDEN");
    std::env::remove_var("TIF_LOG_LEVEL");
}

#[test]
#[serial]
fn test_defaults_without_file() {
    clear_env();
    let config = CliConfig::load(&parse(&[])).unwrap();
    assert_eq!(config, CliConfig::default());
    assert!(!config.convert.include_hidden);
}

#[test]
#[serial]
fn test_nonexistent_file_falls_back_to_defaults() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.toml");
    let config = CliConfig::load(&parse(&["--config", missing.to_str().unwrap()])).unwrap();
    assert_eq!(config, CliConfig::default());
}

#[test]
#[serial]
fn test_file_then_env_then_args() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        r#"
log_level = "error"

[convert]
daily_notes = true
include_hidden = false
"#,
    )
    .unwrap();
    let config_arg = path.to_str().unwrap();

    let config = CliConfig::load(&parse(&["--config", config_arg])).unwrap();
    assert_eq!(config.log_level, Some(LogLevel::Error));
    assert!(config.convert.daily_notes);

    std::env::set_var("TIF_LOG_LEVEL", "INFO");
    std::env::set_var("TIF_INCLUDE_HIDDEN", "true");
    let config = CliConfig::load(&parse(&["--config", config_arg])).unwrap();
    assert_eq!(config.log_level, Some(LogLevel::Info));
    assert!(config.convert.include_hidden);

    let cli = parse(&["--config", config_arg, "--no-daily-notes", "--log-level", "trace"]);
    let config = CliConfig::load(&cli).unwrap();
    assert!(!config.convert.daily_notes);
    assert_eq!(cli.effective_log_level(config.log_level), LogLevel::Trace);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_value_is_error() {
    clear_env();
    std::env::set_var("TIF_LOG_LEVEL", "loud");
    let result = CliConfig::load(&parse(&[]));
    clear_env();
    assert!(result.is_err());
}
