use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tif_convert::ConvertOptions;

use crate::cli::{Cli, LogLevel};

/// CLI configuration
///
/// Precedence, lowest first: defaults, config file, environment, arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level used when neither `--log-level` nor `-v` is given
    pub log_level: Option<LogLevel>,

    /// Use counter-based uids
    pub sequential_uids: bool,

    /// Conversion options
    pub convert: ConvertOptions,
}

impl CliConfig {
    /// Load configuration for a parsed command line
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = Self::from_file_or_default(cli.config.as_deref())?;

        // Override with env vars
        if let Ok(value) = std::env::var("TIF_INCLUDE_HIDDEN") {
            config.convert.include_hidden = parse_bool(&value)
                .with_context(|| format!("Invalid TIF_INCLUDE_HIDDEN value: {value}"))?;
        }
        if let Ok(value) = std::env::var("TIF_LOG_LEVEL") {
            let level = LogLevel::from_str(&value, true)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid TIF_LOG_LEVEL value: {value}"))?;
            config.log_level = Some(level);
        }

        // Override with CLI args (highest priority)
        if cli.include_hidden {
            config.convert.include_hidden = true;
        }
        if cli.no_daily_notes {
            config.convert.daily_notes = false;
        }
        if cli.sequential_uids {
            config.sequential_uids = true;
        }

        Ok(config)
    }

    /// Read the config file, or fall back to defaults when there is none.
    ///
    /// `TIF_TEST_MODE` ignores the user's default config file; an explicit
    /// path is still read.
    pub fn from_file_or_default(config_file: Option<&Path>) -> Result<Self> {
        let path = match config_file {
            Some(path) => Some(path.to_path_buf()),
            None if std::env::var("TIF_TEST_MODE").is_ok() => None,
            None => Self::default_config_path().ok(),
        };

        match path.filter(|p| p.exists()) {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// `~/.config/tif/config.toml` on Linux, the platform equivalent elsewhere
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("tif");
        Ok(config_dir.join("config.toml"))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_toml_sections() {
        let config: CliConfig = toml::from_str(
            r#"
log_level = "info"

[convert]
include_hidden = true
extensions = ["md", "markdown"]
"#,
        )
        .unwrap();

        assert_eq!(config.log_level, Some(LogLevel::Info));
        assert!(config.convert.include_hidden);
        assert_eq!(config.convert.extensions, vec!["md", "markdown"]);
        assert!(config.convert.daily_notes);
    }
}
