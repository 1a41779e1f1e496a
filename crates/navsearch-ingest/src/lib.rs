//! Navy Search Ingest Library
//!
//! Discovers, fetches, and normalizes numbered bulletin messages (NAVADMIN /
//! ALNAV) published as plain-text files behind a remote HTML index.
//!
//! # Architecture
//!
//! - **Codec**: parse, validate, and format structured message identifiers
//! - **Scraper**: turn an index page into candidate records
//! - **Fetcher**: rate-limited chunked body fetching with failure sentinels
//! - **Retry**: bounded additional passes over still-failing records
//! - **Store**: PostgreSQL persistence with full-text search
//! - **Pipeline**: orchestration of a full populate run

pub mod config;
pub mod message;

pub use config::IngestConfig;
pub use message::{IngestError, Result};
