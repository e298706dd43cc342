use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use jobmarket_scraper::collector::hellowork::{HelloWorkCrawler, HELLOWORK_SOURCE};
use jobmarket_scraper::collector::{run_collector, CollectResult};
use jobmarket_scraper::config::Config;
use jobmarket_scraper::error::{EtlError, Result};
use jobmarket_scraper::logging;
use jobmarket_scraper::normalize;
use jobmarket_scraper::types::ListingSource;

#[derive(Parser)]
#[command(name = "jobmarket_scraper")]
#[command(about = "HelloWork job-listing scraper and cleaning pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape raw job listings into the raw CSV file
    Collect {
        /// Search keywords (empty for the whole of France)
        #[arg(long)]
        query: Option<String>,
        /// Number of listings to collect
        #[arg(long)]
        target: Option<usize>,
        /// Listing source to scrape. Available: hellowork
        #[arg(long)]
        source: Option<String>,
        /// Override the raw output file path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Clean and standardize the raw CSV into the analysis-ready CSV
    Normalize {
        /// Override the raw input file path
        #[arg(long)]
        input: Option<PathBuf>,
        /// Override the clean output file path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run collector and normalizer sequentially
    Run {
        /// Search keywords (empty for the whole of France)
        #[arg(long)]
        query: Option<String>,
        /// Number of listings to collect
        #[arg(long)]
        target: Option<usize>,
        /// Listing source to scrape. Available: hellowork
        #[arg(long)]
        source: Option<String>,
    },
}

fn create_source(source_name: &str, config: &Config) -> Option<Box<dyn ListingSource>> {
    match source_name {
        HELLOWORK_SOURCE => Some(Box::new(HelloWorkCrawler::with_config(&config.collector))),
        _ => None,
    }
}

async fn run_collect(
    config: &Config,
    query: Option<String>,
    target: Option<usize>,
    source: Option<String>,
    output: Option<PathBuf>,
) -> Result<CollectResult> {
    let source_name = source.unwrap_or_else(|| HELLOWORK_SOURCE.to_string());
    let source = create_source(&source_name, config)
        .ok_or_else(|| EtlError::Config(format!("Unknown source: {source_name}")))?;

    let query = query.unwrap_or_else(|| config.collector.query.clone());
    let target = target.unwrap_or(config.collector.target);
    let output = output.unwrap_or_else(|| config.files.raw.clone());

    let result = run_collector(source.as_ref(), &query, target, &output).await?;

    println!("\n📊 Collection results for {}:", result.source_name);
    println!("   Listings collected: {}", result.collected);
    println!("   Output file: {}", result.output_file);
    Ok(result)
}

fn run_normalize(config: &Config, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.files.raw.clone());
    let output = output.unwrap_or_else(|| config.files.clean.clone());

    let result = normalize::run(&input, &output)?;

    println!("\n📊 Normalization results:");
    println!("   Rows read: {}", result.rows_read);
    println!("   Rows written: {}", result.rows_written);
    println!("   Exploitable salaries: {}", result.salaries_parsed);
    println!("   Malformed lines skipped: {}", result.bad_lines);
    println!("   Output file: {}", result.output_file);
    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Collect {
            query,
            target,
            source,
            output,
        } => {
            println!("🔄 Running collector...");
            run_collect(&config, query, target, source, output).await?;
        }
        Commands::Normalize { input, output } => {
            println!("🧹 Running normalizer...");
            run_normalize(&config, input, output)?;
        }
        Commands::Run {
            query,
            target,
            source,
        } => {
            println!("🚀 Running full pipeline (collector + normalizer)...");

            println!("\n📥 Step 1: Running collector...");
            run_collect(&config, query, target, source, None).await?;

            println!("\n🧹 Step 2: Running normalizer...");
            run_normalize(&config, None, None)?;

            info!("Full pipeline completed");
            println!("\n✅ Full pipeline completed successfully!");
        }
    }
    Ok(())
}
