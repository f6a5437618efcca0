use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use tif_cli::{cli::Cli, config::CliConfig, run::run};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli)?;

    // Initialize logging; RUST_LOG directives refine the chosen level
    let level: LevelFilter = cli.effective_log_level(config.log_level).into();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    run(&cli, config).await?;
    Ok(())
}
