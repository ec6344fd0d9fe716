//! Process command - extract the canonical record from one report pair.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ibmetrics_core::models::schema::SCHEMA;
use ibmetrics_core::{PairProcessor, PairReport};

use super::load_config;
use crate::output::{format_record, write_record, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Monthly brokerage metrics PDF
    #[arg(required = true)]
    brokerage: PathBuf,

    /// Press release PDF
    #[arg(required = true)]
    press_release: PathBuf,

    /// Reporting period as YYYYMM (default: read from the documents)
    #[arg(short, long)]
    period: Option<String>,

    /// Output directory (default: stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Show missing fields and diagnostics
    #[arg(long)]
    show_diagnostics: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.brokerage.exists() {
        anyhow::bail!("Brokerage report not found: {}", args.brokerage.display());
    }

    info!(
        "Processing pair: {} + {}",
        args.brokerage.display(),
        args.press_release.display()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Extracting metrics...");

    let processor = PairProcessor::new(&config);
    let report = processor.process(
        &args.brokerage,
        &args.press_release,
        args.period.as_deref(),
    );
    pb.finish_and_clear();
    let report = report?;

    match &args.output_dir {
        Some(dir) => {
            let path = write_record(&report.record, dir, &config.output.file_prefix, args.format)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", format_record(&report.record, args.format)?),
    }

    print_summary(&report);
    if args.show_diagnostics {
        print_diagnostics(&report);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub(crate) fn print_summary(report: &PairReport) {
    eprintln!(
        "{} {}: {}/{} fields populated ({} strategy, {} products)",
        style("ℹ").blue(),
        report.record.period,
        report.record.populated(),
        SCHEMA.len(),
        report.strategy,
        report.products
    );
}

fn print_diagnostics(report: &PairReport) {
    if !report.missing.is_empty() {
        eprintln!("{}", style("Missing fields:").yellow());
        for field in &report.missing {
            eprintln!("  - {}", field);
        }
    }
    if !report.diagnostics.is_empty() {
        eprintln!("{}", style("Diagnostics:").yellow());
        for diagnostic in &report.diagnostics {
            eprintln!("  - {}", diagnostic);
        }
    }
}
