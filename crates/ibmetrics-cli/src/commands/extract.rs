//! Extract command - run the tabular cascade on a single brokerage report.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use ibmetrics_core::pdf::{DocumentSource, PdfExtractor};
use ibmetrics_core::{TabularEngine, TargetPeriod};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Monthly brokerage metrics PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Target year
    #[arg(required = true)]
    year: i32,

    /// Target month (1-12)
    #[arg(required = true)]
    month: u32,

    /// Print the metrics as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let period = TargetPeriod::new(args.year, args.month)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Testing extraction on {} for {}", args.input.display(), period);

    let engine = TabularEngine::new(&config.tabular, &config.pdf);
    let extractor = PdfExtractor::with_config(config.pdf);
    let document = extractor.open(&args.input)?;
    let result = engine.extract(&document, period)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.metrics)?);
        return Ok(());
    }

    println!(
        "{} Extraction successful: {} metrics found ({} strategy)",
        style("✓").green(),
        result.metrics.len(),
        result.strategy
    );
    for (metric, value) in &result.metrics {
        println!("  {}: {}", metric, value);
    }
    for diagnostic in &result.diagnostics {
        eprintln!("  {} {}", style("⚠").yellow(), diagnostic);
    }

    Ok(())
}
