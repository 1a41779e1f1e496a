//! Navy Search Common Library
//!
//! Shared types, utilities, and error handling for the Navy Search project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized tracing configuration
//! - **Types**: Message domain types shared by the ingest pipeline and the API
//!
//! # Example
//!
//! ```no_run
//! use navsearch_common::types::{MessageType, FAIL_TEXT};
//!
//! let msg_type = MessageType::Navadmin;
//! assert_eq!(msg_type.as_str(), "NAVADMIN");
//! assert_eq!(FAIL_TEXT, "intentionally left blank");
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{NavSearchError, Result};
