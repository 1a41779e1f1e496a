// Message Ingestion Module
//
// Handles discovery and retrieval of numbered bulletin messages from the
// source site's HTML index pages.
//
// Pipeline stages:
// - Codec: identifier parsing and validation
// - Scraper: index page -> candidate records (no body yet)
// - Dedup: collapse candidates to unique ids, first-seen order
// - Fetcher: chunked, staggered body fetching with failure sentinels
// - Retry: bounded additional passes over records still holding the sentinel
// - Store: PostgreSQL persistence with full-text search
// - Pipeline: full populate run orchestration

pub mod codec;
pub mod dedup;
pub mod fetcher;
pub mod pipeline;
pub mod retry;
pub mod scraper;
pub mod store;

// Re-export main types
pub use codec::{
    create_message_id, is_valid_message_id, parse_message_id, parse_message_uri, CodeRegistry,
    ParsedMessageId,
};
pub use dedup::dedup_by_id;
pub use fetcher::ChunkedFetcher;
pub use pipeline::{resolve_years, MessagePipeline, PipelineStats};
pub use retry::{RetryCoordinator, RetryPolicy};
pub use scraper::IndexScraper;
pub use store::{MessageStore, PgMessageStore, SearchHit};

/// Result type for message ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error types for message ingestion
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<regex::Error> for IngestError {
    fn from(err: regex::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}
