//! Inspect command - print what the extractor sees in a PDF.

use std::path::PathBuf;

use clap::Args;
use console::style;

use ibmetrics_core::pdf::{DocumentSource, Page, PdfExtractor};

use super::load_config;

/// Strings whose presence hints that a page holds the metrics table.
const KEY_INDICATORS: [&str; 8] = [
    "Total Accounts",
    "Client DARTs",
    "Options Contracts",
    "Jan",
    "Feb",
    "Mar",
    "2024",
    "2025",
];

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// PDF file to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Number of pages to show
    #[arg(short, long, default_value = "2")]
    pages: usize,

    /// Number of positioned words to show per page
    #[arg(long, default_value = "8")]
    words: usize,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extractor = PdfExtractor::with_config(config.pdf);
    let document = extractor.open(&args.input)?;

    println!(
        "{} {}",
        style("Analyzing").bold(),
        args.input.display()
    );
    println!("Total pages: {}", document.page_count());

    for (i, page) in document.pages().iter().take(args.pages).enumerate() {
        println!();
        println!("{}", style(format!("--- Page {} ---", i + 1)).cyan());
        print_page(page, args.words);
    }

    Ok(())
}

fn print_page(page: &Page, word_limit: usize) {
    let (width, height) = page.size();
    println!("Dimensions: {:.1} x {:.1}", width, height);

    let text = page.text();
    if text.trim().is_empty() {
        println!("{}", style("No text extracted").yellow());
    } else {
        println!("Text characters: {}", text.chars().count());
        let preview: String = text.chars().take(200).collect();
        println!("First 200 characters: {:?}", preview);

        let found: Vec<&str> = KEY_INDICATORS
            .iter()
            .copied()
            .filter(|indicator| text.contains(indicator))
            .collect();
        println!("Key indicators found: {:?}", found);
    }

    let words = page.words();
    println!("Words extracted: {}", words.len());
    for word in words.iter().take(word_limit) {
        println!("  '{}' at ({:.1}, {:.1})", word.text, word.x0, word.top);
    }

    let tables = page.tables();
    println!("Tables detected: {}", tables.len());
    if let Some(table) = tables.first() {
        let columns = table.first().map_or(0, |row| row.len());
        println!("  Table 1: {} rows x {} columns", table.len(), columns);
        if let Some(header) = table.first() {
            let sample: Vec<&str> = header
                .iter()
                .take(3)
                .map(|cell| cell.as_deref().unwrap_or(""))
                .collect();
            println!("    Header sample: {:?}", sample);
        }
    }
}
