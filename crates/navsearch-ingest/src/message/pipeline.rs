//! Populate pipeline orchestration
//!
//! Sequences one full run for a (type, years) request:
//!
//! 1. Scrape every requested year's index concurrently
//! 2. Concatenate results in year order and dedupe by id
//! 3. Fetch bodies in staggered chunks
//! 4. Run bounded retry passes over still-failing records
//! 5. Atomically replace the stored set for the requested years
//!
//! A run is a full replace: repeated runs against an unchanged source
//! converge on the same stored set rather than accumulating.

use crate::config::IngestConfig;
use crate::message::fetcher::ChunkedFetcher;
use crate::message::retry::{RetryCoordinator, RetryPolicy};
use crate::message::scraper::{normalize_year, IndexScraper};
use crate::message::store::MessageStore;
use crate::message::{dedup_by_id, Result};
use futures::future::join_all;
use navsearch_common::types::MessageType;
use tracing::info;

/// Counters reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    /// Candidate records scraped across all requested years
    pub scraped: usize,
    /// Candidates remaining after deduplication
    pub unique: usize,
    /// Records persisted by the final replace
    pub persisted: u64,
    /// Records persisted with the failure sentinel
    pub failed: usize,
}

/// Merge configured default years with extra positional arguments.
///
/// Non-numeric entries are dropped, 4-digit years collapse to their trailing
/// two digits, and duplicates are removed preserving first appearance.
pub fn resolve_years(defaults: &[String], extra: &[String]) -> Vec<String> {
    let mut years = Vec::new();
    for year in defaults.iter().chain(extra.iter()) {
        let Ok(normalized) = normalize_year(year) else {
            continue;
        };
        if !years.contains(&normalized) {
            years.push(normalized);
        }
    }
    years
}

/// Full populate pipeline for one message type
pub struct MessagePipeline<S: MessageStore> {
    scraper: IndexScraper,
    fetcher: ChunkedFetcher,
    retry: RetryCoordinator,
    store: S,
}

impl<S: MessageStore> MessagePipeline<S> {
    /// Create a pipeline from configuration and a store
    pub fn new(config: &IngestConfig, store: S) -> Result<Self> {
        Ok(Self {
            scraper: IndexScraper::new(config)?,
            fetcher: ChunkedFetcher::new(config)?,
            retry: RetryCoordinator::new(RetryPolicy::from_config(config)),
            store,
        })
    }

    /// Run one populate pass for (type, years)
    pub async fn run(
        &self,
        message_type: MessageType,
        years: &[String],
    ) -> Result<PipelineStats> {
        let years = resolve_years(years, &[]);

        info!(message_type = %message_type, years = ?years, "Started data populate");

        // Scrape all requested years concurrently; any scrape failure aborts
        // the run before the stored set is touched
        let scraped_per_year = join_all(
            years
                .iter()
                .map(|year| self.scraper.scrape(message_type, year)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        let candidates: Vec<_> = scraped_per_year.into_iter().flatten().collect();
        let scraped = candidates.len();

        let unique_candidates = dedup_by_id(candidates);
        let unique = unique_candidates.len();
        info!(scraped, unique, "Deduplicated candidates");

        let fetched = self.fetcher.fetch_all(unique_candidates).await;
        let failing = fetched.iter().filter(|r| r.is_request_fail()).count();
        info!(failing, "Chunked fetch complete");

        let records = self.retry.run(&self.fetcher, fetched).await;
        let failed = records.iter().filter(|r| r.is_request_fail()).count();

        let persisted = self
            .store
            .replace_years(message_type, &years, &records)
            .await?;

        info!(persisted, failed, "Populate complete");

        Ok(PipelineStats {
            scraped,
            unique,
            persisted,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_years_merges_and_dedupes() {
        let resolved = resolve_years(&years(&["16"]), &years(&["15", "16", "2017"]));
        assert_eq!(resolved, years(&["16", "15", "17"]));
    }

    #[test]
    fn test_resolve_years_drops_non_numeric() {
        let resolved = resolve_years(&years(&["16"]), &years(&["abc", "1x", ""]));
        assert_eq!(resolved, years(&["16"]));
    }

    #[test]
    fn test_resolve_years_empty() {
        assert!(resolve_years(&[], &[]).is_empty());
    }
}
