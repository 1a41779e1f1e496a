//! HTTP route handlers

pub mod messages;
pub mod search;
