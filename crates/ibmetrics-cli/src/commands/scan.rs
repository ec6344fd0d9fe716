//! Scan command - find report pairs by file name and process each once.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use glob::{glob_with, MatchOptions};
use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, error, info, warn};

use ibmetrics_core::{DocumentSource, PairProcessor, PairReport};

use super::load_config;
use super::process::print_summary;
use crate::output::{write_record, OutputFormat};

lazy_static! {
    static ref REPORT_FILE: Regex =
        Regex::new(r"(?i)^(\d{6})(MetricsPressRelease|MonthlyBrokerageData)\.pdf$").unwrap();
}

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Directory to scan recursively
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output directory (default: next to each pair)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Which document of a pair a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportKind {
    Brokerage,
    PressRelease,
}

impl ReportKind {
    fn file_suffix(&self) -> &'static str {
        match self {
            ReportKind::Brokerage => "MonthlyBrokerageData",
            ReportKind::PressRelease => "MetricsPressRelease",
        }
    }
}

/// Classify a file name as `(date prefix, kind)`.
fn classify(name: &str) -> Option<(String, ReportKind)> {
    let caps = REPORT_FILE.captures(name)?;
    let kind = if caps[2].eq_ignore_ascii_case(ReportKind::Brokerage.file_suffix()) {
        ReportKind::Brokerage
    } else {
        ReportKind::PressRelease
    };
    Some((caps[1].to_string(), kind))
}

/// Reports sharing a directory and date prefix.
#[derive(Debug, Default)]
struct ReportGroup {
    brokerage: Option<PathBuf>,
    press_release: Option<PathBuf>,
}

impl ReportGroup {
    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.press_release.is_none() {
            missing.push(ReportKind::PressRelease.file_suffix());
        }
        if self.brokerage.is_none() {
            missing.push(ReportKind::Brokerage.file_suffix());
        }
        missing
    }
}

/// A complete pair found by discovery.
struct ReportPair<'a> {
    dir: &'a Path,
    prefix: &'a str,
    brokerage: &'a Path,
    press: &'a Path,
}

/// Processes pairs one at a time and writes one output file per pair.
struct Batch<'a, S: DocumentSource> {
    processor: &'a PairProcessor<S>,
    output_dir: Option<&'a Path>,
    file_prefix: &'a str,
    format: OutputFormat,
    continue_on_error: bool,
}

impl<S: DocumentSource> Batch<'_, S> {
    /// Process every pair, returning the success count and failed prefixes.
    ///
    /// Without `continue_on_error` the first failure aborts the batch.
    fn run(
        &self,
        pairs: &[ReportPair<'_>],
        pb: &ProgressBar,
    ) -> anyhow::Result<(usize, Vec<(String, String)>)> {
        let mut successful = 0;
        let mut failed = Vec::new();

        for pair in pairs {
            match self.process_pair(pair) {
                Ok((report, path)) => {
                    debug!("Wrote output to {}", path.display());
                    pb.suspend(|| print_summary(&report));
                    successful += 1;
                }
                Err(e) if self.continue_on_error => {
                    error!("Failed to process {}: {:#}", pair.prefix, e);
                    failed.push((pair.prefix.to_string(), format!("{:#}", e)));
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", pair.prefix, e);
                    anyhow::bail!("Processing failed for {}: {:#}", pair.prefix, e);
                }
            }
            pb.inc(1);
        }

        Ok((successful, failed))
    }

    fn process_pair(&self, pair: &ReportPair<'_>) -> anyhow::Result<(PairReport, PathBuf)> {
        let report = self
            .processor
            .process(pair.brokerage, pair.press, Some(pair.prefix))?;
        let out_dir = self.output_dir.unwrap_or(pair.dir);
        let path = write_record(&report.record, out_dir, self.file_prefix, self.format)
            .with_context(|| format!("failed to write output to {}", out_dir.display()))?;
        Ok((report, path))
    }
}

/// Group matching files by directory and date prefix.
fn discover(root: &Path) -> anyhow::Result<BTreeMap<(PathBuf, String), ReportGroup>> {
    let pattern = root.join("**").join("*.pdf");
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut groups: BTreeMap<(PathBuf, String), ReportGroup> = BTreeMap::new();
    for path in glob_with(&pattern.to_string_lossy(), options)?.filter_map(|r| r.ok()) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((prefix, kind)) = classify(name) else {
            continue;
        };
        debug!("Found: {} -> {} {:?}", name, prefix, kind);

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let group = groups.entry((dir, prefix)).or_default();
        match kind {
            ReportKind::Brokerage => group.brokerage = Some(path),
            ReportKind::PressRelease => group.press_release = Some(path),
        }
    }
    Ok(groups)
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.dir.is_dir() {
        anyhow::bail!("Not a directory: {}", args.dir.display());
    }

    info!("Scanning {} for report pairs...", args.dir.display());
    let groups = discover(&args.dir)?;

    let mut pairs = Vec::new();
    for ((dir, prefix), group) in &groups {
        match (&group.brokerage, &group.press_release) {
            (Some(brokerage), Some(press)) => {
                info!("Found complete pair for {}", prefix);
                pairs.push(ReportPair {
                    dir,
                    prefix,
                    brokerage,
                    press,
                });
            }
            _ => {
                let missing = group.missing().join(", ");
                warn!("Incomplete pair for {} in {}, missing: {}", prefix, dir.display(), missing);
                eprintln!(
                    "{} Incomplete pair {} in {}: missing {}",
                    style("⚠").yellow(),
                    prefix,
                    dir.display(),
                    missing
                );
            }
        }
    }

    if pairs.is_empty() {
        anyhow::bail!(
            "No complete report pairs found. Expected YYYYMMMonthlyBrokerageData.pdf and YYYYMMMetricsPressRelease.pdf"
        );
    }

    println!(
        "{} Found {} complete pairs to process",
        style("ℹ").blue(),
        pairs.len()
    );

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs")?
            .progress_chars("=>-"),
    );

    let processor = PairProcessor::new(&config);
    let batch = Batch {
        processor: &processor,
        output_dir: args.output_dir.as_deref(),
        file_prefix: &config.output.file_prefix,
        format: args.format,
        continue_on_error: args.continue_on_error,
    };
    let (successful, failed) = batch.run(&pairs, &pb)?;

    pb.finish_with_message("Complete");

    println!();
    println!(
        "{} Processing complete: {}/{} successful in {:?}",
        style("✓").green(),
        successful,
        pairs.len(),
        start.elapsed()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed pairs:").red());
        for (prefix, reason) in &failed {
            println!("  - {}: {}", prefix, reason);
        }
    }

    Ok(())
}
