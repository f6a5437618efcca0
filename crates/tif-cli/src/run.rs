//! Conversion command

use anyhow::{Context, Result};
use tif_convert::{
    convert_vault, target_path_for, ConversionContext, ConversionSummary, SequentialUids,
};
use tracing::info;

use crate::cli::Cli;
use crate::config::CliConfig;

/// Convert the vault named on the command line and print the summary
pub async fn run(cli: &Cli, config: CliConfig) -> Result<ConversionSummary> {
    let today = cli
        .timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let context = if config.sequential_uids {
        ConversionContext::with_uids(Box::new(SequentialUids::default()))
    } else {
        ConversionContext::new()
    };
    let mut context = context.with_options(config.convert);

    info!(vault = %cli.vault.display(), today, "starting conversion");
    let summary = convert_vault(&cli.vault, today, &mut context)
        .await
        .with_context(|| format!("Failed to convert vault: {}", cli.vault.display()))?;

    let target = target_path_for(&cli.vault);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Wrote {}", target.display());
        print_summary(&summary);
    }

    Ok(summary)
}

fn print_summary(summary: &ConversionSummary) {
    println!("  top-level nodes: {}", summary.top_level_nodes);
    println!("  leaf nodes:      {}", summary.leaf_nodes);
    println!("  total nodes:     {}", summary.total_nodes);
    println!("  calendar nodes:  {}", summary.calendar_nodes);
    println!("  fields:          {}", summary.fields);
    println!("  broken refs:     {}", summary.broken_refs);
}
