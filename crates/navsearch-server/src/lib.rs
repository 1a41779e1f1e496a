//! Navy Search Server Library
//!
//! HTTP API serving stored bulletin messages.
//!
//! # Endpoints
//!
//! - `GET /message?type&year&num` — message body by attribute query
//! - `GET /message/:id` — message body by canonical id
//! - `GET /message/NAVADMIN/:year/:num` — NAVADMIN body by path fields
//! - `GET /message/ALNAV/:year/:num` — ALNAV body by path fields
//! - `GET /messages?type` — stored ids for a type
//! - `GET /search?q` — ranked full-text search
//! - `GET /health` — liveness and database connectivity
//!
//! Message bodies are served as plain text; a message that was indexed but
//! never successfully fetched, or that does not exist, yields the fixed
//! "intentionally left blank" body. Malformed ids and parameters are
//! rejected with a structured 400, never a 500.

pub mod api;
pub mod config;
pub mod error;
pub mod routes;
pub mod validation;

use navsearch_ingest::message::PgMessageStore;
use sqlx::PgPool;

// Re-export commonly used types
pub use error::{AppError, Violation};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub store: PgMessageStore,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        let store = PgMessageStore::new(db.clone());
        Self { db, store }
    }
}
