//! Message lookup routes
//!
//! All lookup variants resolve to a plain-text message body. A message that
//! is missing, or was indexed but never successfully fetched, yields the
//! fixed "intentionally left blank" body rather than an error.

use crate::error::AppError;
use crate::validation::{validate_message_id, validate_year_num};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use navsearch_common::types::{MessageRecord, MessageType, FAIL_TEXT};
use navsearch_ingest::message::{parse_message_id, MessageStore};
use serde::{Deserialize, Serialize};

pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_message))
        .route("/NAVADMIN/:year/:num", get(get_navadmin))
        .route("/ALNAV/:year/:num", get(get_alnav))
        .route("/:id", get(get_message_by_id))
}

/// Attribute query for a single message
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(default, rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub num: String,
}

/// One stored message id, as listed by `GET /messages`
#[derive(Debug, Serialize)]
pub struct MessageSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub year: String,
    pub num: String,
}

fn body_text(record: Option<MessageRecord>) -> String {
    record
        .and_then(|r| r.text)
        .unwrap_or_else(|| FAIL_TEXT.to_string())
}

async fn lookup(
    state: &AppState,
    message_type: &str,
    year: &str,
    num: &str,
) -> Result<String, AppError> {
    // Unknown types cannot match any stored record
    let Ok(message_type) = message_type.parse::<MessageType>() else {
        return Ok(FAIL_TEXT.to_string());
    };
    let record = state.store.find_one(message_type, year, num).await?;
    Ok(body_text(record))
}

#[tracing::instrument(skip(state, query), fields(message_type = %query.message_type))]
async fn get_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<String, AppError> {
    lookup(&state, &query.message_type, &query.year, &query.num).await
}

#[tracing::instrument(skip(state))]
async fn get_message_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, AppError> {
    validate_message_id(&id).map_err(AppError::Validation)?;

    let details = parse_message_id(&id);
    lookup(&state, &details.message_type, &details.year, &details.num).await
}

#[tracing::instrument(skip(state))]
async fn get_navadmin(
    State(state): State<AppState>,
    Path((year, num)): Path<(String, String)>,
) -> Result<String, AppError> {
    validate_year_num(&year, &num).map_err(AppError::Validation)?;
    lookup(&state, "NAVADMIN", &year, &num).await
}

#[tracing::instrument(skip(state))]
async fn get_alnav(
    State(state): State<AppState>,
    Path((year, num)): Path<(String, String)>,
) -> Result<String, AppError> {
    validate_year_num(&year, &num).map_err(AppError::Validation)?;
    lookup(&state, "ALNAV", &year, &num).await
}

/// List query for stored messages
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_list_type", rename = "type")]
    pub message_type: String,
}

fn default_list_type() -> String {
    "NAVADMIN".to_string()
}

#[tracing::instrument(skip(state, query), fields(message_type = %query.message_type))]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MessageSummary>>, AppError> {
    let Ok(message_type) = query.message_type.parse::<MessageType>() else {
        return Ok(Json(Vec::new()));
    };

    let records = state.store.find_all(message_type).await?;
    let summaries = records
        .into_iter()
        .map(|r| MessageSummary {
            id: r.id,
            message_type: r.message_type.as_str().to_string(),
            year: r.year,
            num: r.num,
        })
        .collect();

    Ok(Json(summaries))
}
