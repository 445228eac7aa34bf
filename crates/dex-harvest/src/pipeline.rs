//! Harvest pipeline
//!
//! Listing → detail dispatch (one branch per entry) → sub-resource fan-out →
//! aggregator → final store. The aggregator and store sit behind a single
//! mutex that is only ever held for synchronous bookkeeping; every await
//! point is a fetch.
//!
//! A shutdown signal (Ctrl-C by default) stops the crawl and force-flushes
//! whatever is still pending, so partial results are never lost.

use crate::aggregator::{Aggregator, RecordOutcome, Registration};
use crate::config::HarvestConfig;
use crate::detail::{DetailParser, Dispatch, SubResourceRequest};
use crate::error::Result;
use crate::extract::{self, first_description, TextStrategy};
use crate::fetch::PageFetcher;
use crate::listing::{IdentityLookup, Listing, ListingExtractor};
use crate::stats::HarvestStats;
use dex_common::document;
use dex_common::types::{Ability, EntityRecord, EntityStub};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Result of a finished run
#[derive(Debug)]
pub struct HarvestOutput {
    /// Deduplicated records sorted by identity
    pub records: Vec<EntityRecord>,
    pub stats: HarvestStats,
}

impl HarvestOutput {
    /// Write the records as a pretty-printed JSON array
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        document::write_json_pretty(path.as_ref(), &self.records)?;
        info!(
            path = %path.as_ref().display(),
            records = self.records.len(),
            "Wrote final document"
        );
        Ok(())
    }
}

pub struct HarvestPipeline {
    config: HarvestConfig,
    fetcher: Arc<dyn PageFetcher>,
    listing_extractor: ListingExtractor,
    detail_parser: DetailParser,
    description_strategies: Vec<Box<dyn TextStrategy>>,
    state: Mutex<Aggregator>,
}

impl HarvestPipeline {
    pub fn new(config: HarvestConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        config.validate()?;

        let aggregator =
            Aggregator::new().with_collapse_duplicates(config.collapse_duplicate_sub_resources);

        Ok(Self {
            listing_extractor: ListingExtractor::new()?,
            detail_parser: DetailParser::new()?,
            description_strategies: extract::description_strategies()?,
            state: Mutex::new(aggregator),
            config,
            fetcher,
        })
    }

    /// Fetch and parse the listing page
    pub async fn fetch_listing(&self) -> Result<Listing> {
        let url = self.config.listing_url()?;
        info!(url = %url, "Fetching listing");

        let html = self.fetcher.fetch(&url).await?;
        self.listing_extractor.parse(&html, &url)
    }

    /// Crawl `listing`, flushing early on Ctrl-C
    pub async fn run(self, listing: Listing) -> HarvestOutput {
        self.run_until(listing, shutdown_signal()).await
    }

    /// Crawl `listing` until it is done or `shutdown` resolves, then flush
    pub async fn run_until<S>(self, listing: Listing, shutdown: S) -> HarvestOutput
    where
        S: Future<Output = ()>,
    {
        {
            let crawl = self.crawl(&listing);
            tokio::select! {
                biased;
                _ = shutdown => warn!("Shutdown requested, flushing pending aggregates"),
                _ = crawl => info!("Crawl finished"),
            }
        }

        self.finish()
    }

    async fn crawl(&self, listing: &Listing) {
        let stubs = match self.config.limit {
            Some(limit) => &listing.stubs[..limit.min(listing.stubs.len())],
            None => &listing.stubs[..],
        };

        {
            let mut state = self.state();
            let stats = state.stats_mut();
            stats.listed = listing.stubs.len();
            stats.dispatched = stubs.len();
        }

        info!(
            stubs = stubs.len(),
            concurrency = self.config.concurrency,
            "Dispatching detail fetches"
        );

        stream::iter(stubs.iter().cloned())
            .map(|stub| self.harvest_entry(stub, &listing.lookup))
            .buffer_unordered(self.config.concurrency)
            .collect::<()>()
            .await;
    }

    async fn harvest_entry(&self, stub: EntityStub, lookup: &IdentityLookup) {
        let html = match self.fetcher.fetch(&stub.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(name = %stub.name, url = %stub.url, error = %e, "Detail fetch failed");
                self.state().stats_mut().detail_failures += 1;
                return;
            },
        };

        let requests = match self.detail_parser.dispatch(stub, &html, lookup) {
            Dispatch::Complete(record) => {
                self.state().complete(record);
                return;
            },
            Dispatch::Pending { record, requests } => {
                let registration = self.state().register(record, requests.len());
                if registration != Registration::Registered {
                    return;
                }
                requests
            },
        };

        join_all(requests.into_iter().map(|request| self.harvest_sub_resource(request))).await;
    }

    async fn harvest_sub_resource(&self, request: SubResourceRequest) {
        let SubResourceRequest { key, name, url } = request;

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                // never recorded; the aggregate waits for the shutdown flush
                warn!(key = %key, ability = %name, error = %e, "Sub-resource fetch failed");
                self.state().stats_mut().sub_fetch_failures += 1;
                return;
            },
        };

        let description = self.describe(&html);
        let outcome = self.state().record_sub_result(
            &key,
            Ability {
                name,
                url,
                description,
            },
        );

        if let RecordOutcome::Finalized(outcome) = outcome {
            debug!(key = %key, ?outcome, "Aggregate finalized");
        }
    }

    fn describe(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        first_description(&self.description_strategies, &document)
            .unwrap_or_else(|| self.config.missing_description.clone())
    }

    fn state(&self) -> MutexGuard<'_, Aggregator> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(self) -> HarvestOutput {
        let aggregator = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let pending = aggregator.pending_len();
        if pending > 0 {
            info!(pending, "Flushing incomplete aggregates");
        }

        let (records, stats) = aggregator.finish();
        stats.log_summary();

        HarvestOutput { records, stats }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C, running to completion");
        std::future::pending::<()>().await;
    }
}
