//! Dex Harvest - catalog harvesting tool

use anyhow::{Context, Result};
use clap::Parser;
use dex_common::logging::{init_logging, LogConfig, LogLevel};
use dex_harvest::config::DEFAULT_LISTING_OUTPUT_PATH;
use dex_harvest::{HarvestConfig, HarvestPipeline, HttpFetcher, Listing};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "dex-harvest")]
#[command(author, version, about = "Pokedex catalog harvester")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Harvest every entry with its details and abilities
    Run {
        /// Output file (overrides DEX_OUTPUT)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start from a previously exported listing instead of fetching it
        #[arg(long)]
        from_listing: Option<PathBuf>,

        /// Harvest at most this many entries
        #[arg(long)]
        limit: Option<usize>,

        /// Maximum requests in flight
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Site root (overrides DEX_BASE_URL)
        #[arg(long)]
        base_url: Option<Url>,

        /// Keep only the first ability sharing a name within one entry
        #[arg(long)]
        collapse_duplicates: bool,
    },

    /// Export the listing only
    Listing {
        /// Output file
        #[arg(short, long, default_value = DEFAULT_LISTING_OUTPUT_PATH)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("dex-harvest")
        .build()
        .merge_env()
        .context("Invalid logging configuration")?;

    let _guard = init_logging(&log_config)?;

    let mut config = HarvestConfig::from_env().context("Invalid harvest configuration")?;

    match cli.command {
        Command::Run {
            output,
            from_listing,
            limit,
            concurrency,
            base_url,
            collapse_duplicates,
        } => {
            if let Some(output) = output {
                config = config.with_output_path(output);
            }
            if let Some(limit) = limit {
                config = config.with_limit(limit);
            }
            if let Some(concurrency) = concurrency {
                config = config.with_concurrency(concurrency);
            }
            if let Some(base_url) = base_url {
                config = config.with_base_url(base_url);
            }
            if collapse_duplicates {
                config = config.with_collapse_duplicates(true);
            }
            config.validate()?;

            let fetcher = Arc::new(HttpFetcher::new(&config)?);
            let pipeline = HarvestPipeline::new(config.clone(), fetcher)?;

            let listing = match from_listing {
                Some(path) => Listing::load(&path)
                    .with_context(|| format!("Failed to load listing {}", path.display()))?,
                None => pipeline.fetch_listing().await.context("Failed to fetch listing")?,
            };

            let output = pipeline.run(listing).await;
            output
                .write(&config.output_path)
                .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

            info!("{} entries saved to {}", output.records.len(), config.output_path.display());
        },
        Command::Listing { output } => {
            let fetcher = Arc::new(HttpFetcher::new(&config)?);
            let pipeline = HarvestPipeline::new(config, fetcher)?;

            let listing = pipeline.fetch_listing().await.context("Failed to fetch listing")?;
            listing
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            info!("{} entries saved to {}", listing.stubs.len(), output.display());
        },
    }

    Ok(())
}
