//! `ibmetrics` turns an IBKR monthly brokerage report and its metrics press
//! release into one standardized 20-column record per month.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{config, extract, inspect, process, scan};

/// Environment variable overriding the verbosity flags with a filter directive.
const LOG_ENV: &str = "IBMETRICS_LOG";

/// Extract standardized monthly metrics from IBKR brokerage report PDFs
#[derive(Parser)]
#[command(name = "ibmetrics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a JSON config file (see `ibmetrics config init`)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one YYYYMMMonthlyBrokerageData / YYYYMMMetricsPressRelease pair
    Process(process::ProcessArgs),

    /// Find report pairs under a directory by file name and process each
    Scan(scan::ScanArgs),

    /// Show the text, words and tables the extractor sees in a PDF
    Inspect(inspect::InspectArgs),

    /// Run only the tabular cascade on a brokerage report for a given month
    Extract(extract::ExtractArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Filter for our own crates; PDF parser internals stay at warn.
fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }

    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        _ => Level::TRACE,
    };
    EnvFilter::new(format!(
        "warn,ibmetrics={level},ibmetrics_core={level}",
        level = level
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli.verbose, cli.quiet))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Scan(args) => scan::run(args, config_path).await,
        Commands::Inspect(args) => inspect::run(args, config_path).await,
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Config(args) => config::run(args).await,
    }
}
