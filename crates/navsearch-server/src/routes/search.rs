//! Full-text search route

use crate::error::AppError;
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use navsearch_ingest::message::MessageStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// One ranked search result
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub year: String,
    pub num: String,
    pub rank: f32,
}

#[tracing::instrument(skip(state, query), fields(q = %query.q))]
pub async fn search_messages(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResultItem>>, AppError> {
    let queries = vec![query.q];
    let results = state.store.text_search(&queries).await?;

    let items = results
        .into_iter()
        .flatten()
        .map(|hit| SearchResultItem {
            id: hit.record.id,
            message_type: hit.record.message_type.as_str().to_string(),
            year: hit.record.year,
            num: hit.record.num,
            rank: hit.rank,
        })
        .collect();

    Ok(Json(items))
}
