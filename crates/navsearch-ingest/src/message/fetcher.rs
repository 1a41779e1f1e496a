//! Chunked message body fetcher
//!
//! Partitions deduplicated candidates into fixed-size chunks and fetches each
//! item's body. Chunk `i` is held back for `i * base_delay` before its
//! requests are issued, pacing load on the source; within a chunk all fetches
//! run concurrently. A failed fetch never aborts its siblings: the record is
//! marked with the failure sentinel instead.

use crate::config::IngestConfig;
use crate::message::Result;
use futures::future::join_all;
use navsearch_common::types::{MessageRecord, FAIL_TEXT};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Fetcher for message bodies
pub struct ChunkedFetcher {
    client: Client,
    chunk_size: usize,
    base_delay: Duration,
}

impl ChunkedFetcher {
    /// Create a new fetcher from configuration
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("navy-search-populate/0.1")
            .build()?;

        Ok(Self {
            client,
            chunk_size: config.chunk_size.max(1),
            base_delay: Duration::from_millis(config.chunk_delay_ms),
        })
    }

    /// Delay applied before chunk `index` (0-based) starts issuing requests
    pub fn chunk_delay(&self, index: usize) -> Duration {
        self.base_delay * index as u32
    }

    /// Number of chunks a candidate list of `len` items partitions into
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Fetch bodies for all records, chunked and staggered.
    ///
    /// Results are returned in input order, each record carrying either the
    /// fetched body or the failure sentinel.
    pub async fn fetch_all(&self, records: Vec<MessageRecord>) -> Vec<MessageRecord> {
        if records.is_empty() {
            return records;
        }

        let total_chunks = self.chunk_count(records.len());
        let chunks: Vec<Vec<MessageRecord>> = records
            .chunks(self.chunk_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        let chunk_futures = chunks.into_iter().enumerate().map(|(index, chunk)| {
            let delay = self.chunk_delay(index);
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let items = join_all(chunk.into_iter().map(|r| self.fetch_one(r))).await;
                info!(chunk = index + 1, total = total_chunks, "Chunk complete");
                items
            }
        });

        join_all(chunk_futures).await.into_iter().flatten().collect()
    }

    /// Fetch a single record's body, substituting the sentinel on any failure
    pub async fn fetch_one(&self, mut record: MessageRecord) -> MessageRecord {
        record.text = Some(match self.request_text(&record.url).await {
            Ok(body) => body,
            Err(err) => {
                debug!(id = %record.id, url = %record.url, error = %err, "Fetch failed");
                FAIL_TEXT.to_string()
            },
        });
        record
    }

    async fn request_text(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        response.text().await
    }
}
