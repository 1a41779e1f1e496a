//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// One validation rule violation, reported to the client
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    pub code: String,
    pub title: String,
    pub description: String,
}

impl Violation {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Ingest error: {0}")]
    Ingest(#[from] navsearch_ingest::IngestError),

    #[error("Validation failed")]
    Validation(Vec<Violation>),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Bad input is always a structured 400, never a crash
            AppError::Validation(violations) => {
                tracing::warn!(?violations, "Request validation failed");
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": violations })))
                    .into_response()
            },
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                internal_error_response("A database error occurred")
            },
            AppError::Ingest(ref e) => {
                tracing::error!("Ingest error: {:?}", e);
                internal_error_response("An internal error occurred")
            },
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                internal_error_response("An internal error occurred")
            },
        }
    }
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "errors": [{
                "code": "INTERNAL_ERROR",
                "title": "Internal Server Error",
                "description": message,
            }]
        })),
    )
        .into_response()
}
