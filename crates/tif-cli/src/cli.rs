use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tif")]
#[command(about = "tif - convert a markdown vault into a Tana Intermediate Format file")]
#[command(version)]
pub struct Cli {
    /// Vault directory; output is written to <VAULT>.tif.json
    pub vault: PathBuf,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'warn'
    #[arg(short = 'l', long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/tif/config.toml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Reference timestamp in milliseconds since the epoch (defaults to now)
    #[arg(long)]
    pub timestamp: Option<i64>,

    /// Also convert hidden entries such as .obsidian and .trash
    #[arg(long)]
    pub include_hidden: bool,

    /// Keep YYYY-MM-DD notes as plain nodes instead of calendar dates
    #[arg(long)]
    pub no_daily_notes: bool,

    /// Use counter-based uids so repeated runs produce identical output
    #[arg(long)]
    pub sequential_uids: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// `--log-level` wins over `-v`, which wins over the configured level
    pub fn effective_log_level(&self, configured: Option<LogLevel>) -> LogLevel {
        self.log_level
            .or(self.verbose.then_some(LogLevel::Debug))
            .or(configured)
            .unwrap_or(LogLevel::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["tif", "notes/vault"]).unwrap();
        assert_eq!(cli.vault, PathBuf::from("notes/vault"));
        assert!(!cli.include_hidden);
        assert_eq!(cli.effective_log_level(None), LogLevel::Warn);
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::try_parse_from(["tif", "v", "-v"]).unwrap();
        assert_eq!(cli.effective_log_level(Some(LogLevel::Error)), LogLevel::Debug);

        let cli = Cli::try_parse_from(["tif", "v", "-v", "--log-level", "trace"]).unwrap();
        assert_eq!(cli.effective_log_level(None), LogLevel::Trace);

        let cli = Cli::try_parse_from(["tif", "v"]).unwrap();
        assert_eq!(cli.effective_log_level(Some(LogLevel::Info)), LogLevel::Info);
    }

    #[test]
    fn test_vault_required() {
        assert!(Cli::try_parse_from(["tif"]).is_err());
    }

    #[test]
    fn test_level_filter_conversion() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::OFF);
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::DEBUG);
    }
}
