//! Ingest configuration

use navsearch_common::types::NPC_DOMAIN;
use serde::{Deserialize, Serialize};

// ============================================================================
// Ingest Configuration Constants
// ============================================================================

/// Default number of records fetched per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// Default stagger between chunk starts, in milliseconds.
pub const DEFAULT_CHUNK_DELAY_MS: u64 = 1000;

/// Default number of retry passes over still-failing records.
pub const DEFAULT_RETRY_PASSES: u32 = 4;

/// Default base backoff before a retry pass, in milliseconds.
pub const DEFAULT_RETRY_BASE_MS: u64 = 500;

/// Default backoff ceiling, in milliseconds.
pub const DEFAULT_RETRY_MAX_MS: u64 = 8000;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Ingest pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Source domain hosting index pages and message bodies
    pub domain: String,
    /// Number of records fetched per chunk
    pub chunk_size: usize,
    /// Stagger between chunk starts, in milliseconds
    pub chunk_delay_ms: u64,
    /// Number of retry passes over still-failing records
    pub retry_passes: u32,
    /// Base backoff before a retry pass, in milliseconds
    pub retry_base_ms: u64,
    /// Backoff ceiling, in milliseconds
    pub retry_max_ms: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            domain: NPC_DOMAIN.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay_ms: DEFAULT_CHUNK_DELAY_MS,
            retry_passes: DEFAULT_RETRY_PASSES,
            retry_base_ms: DEFAULT_RETRY_BASE_MS,
            retry_max_ms: DEFAULT_RETRY_MAX_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// Environment variables:
    /// - `NAVSEARCH_DOMAIN`: source domain override
    /// - `NAVSEARCH_CHUNK_SIZE`: records per fetch chunk
    /// - `NAVSEARCH_CHUNK_DELAY_MS`: stagger between chunk starts
    /// - `NAVSEARCH_RETRY_PASSES`: retry passes over failing records
    /// - `NAVSEARCH_REQUEST_TIMEOUT`: per-request timeout in seconds
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(domain) = std::env::var("NAVSEARCH_DOMAIN") {
            config.domain = domain;
        }
        if let Ok(val) = std::env::var("NAVSEARCH_CHUNK_SIZE") {
            config.chunk_size = val.parse()?;
        }
        if let Ok(val) = std::env::var("NAVSEARCH_CHUNK_DELAY_MS") {
            config.chunk_delay_ms = val.parse()?;
        }
        if let Ok(val) = std::env::var("NAVSEARCH_RETRY_PASSES") {
            config.retry_passes = val.parse()?;
        }
        if let Ok(val) = std::env::var("NAVSEARCH_REQUEST_TIMEOUT") {
            config.request_timeout_secs = val.parse()?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Override the source domain, trimming any trailing slash
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        self.domain = domain.trim_end_matches('/').to_string();
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.domain.is_empty() {
            anyhow::bail!("domain must not be empty");
        }
        if !self.domain.starts_with("http://") && !self.domain.starts_with("https://") {
            anyhow::bail!("domain must start with http:// or https://");
        }
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be greater than zero");
        }
        Ok(())
    }
}
