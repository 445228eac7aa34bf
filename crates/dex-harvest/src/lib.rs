//! Dex Harvest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Harvests the pokemondb.net national dex into a single sorted JSON document.
//!
//! # Pipeline
//!
//! - **Listing**: the catalog table becomes entity stubs plus a name → number lookup
//! - **Detail**: each stub's page yields vitals, evolutions and ability links
//! - **Effectiveness**: defensive and offensive type sets from static charts
//! - **Aggregator**: joins the variable number of ability fetches per entry
//! - **Store**: deduplicates by number and sorts the output
//!
//! # Example
//!
//! ```no_run
//! use dex_harvest::{HarvestConfig, HarvestPipeline, HttpFetcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HarvestConfig::from_env()?;
//!     let fetcher = Arc::new(HttpFetcher::new(&config)?);
//!     let pipeline = HarvestPipeline::new(config.clone(), fetcher)?;
//!
//!     let listing = pipeline.fetch_listing().await?;
//!     let output = pipeline.run(listing).await;
//!     output.write(&config.output_path)?;
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod detail;
pub mod effectiveness;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod listing;
pub mod pipeline;
pub mod stats;
pub mod store;

pub use config::HarvestConfig;
pub use error::{HarvestError, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use listing::Listing;
pub use pipeline::{HarvestOutput, HarvestPipeline};
pub use stats::HarvestStats;
