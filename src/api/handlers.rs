use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{CatalogItem, RecommendationList, ScoredItem, SortKey, Suggestion},
    services::{
        recommendations::{self, RecommendationView, REFERENCE_SEARCH_LIMIT},
        resort,
    },
};

use super::AppState;

/// Upper bound accepted for `limit` on the search endpoint
const MAX_SEARCH_LIMIT: u32 = 25;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
    #[serde(default)]
    pub sort: SortKey,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub reference: CatalogItem,
    pub recommendations: Vec<RecommendationView>,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: SortKey,
    pub recommendations: Vec<ScoredItem>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Catalog search, most popular first
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let limit = params.limit.unwrap_or(REFERENCE_SEARCH_LIMIT);
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_SEARCH_LIMIT
        )));
    }

    let items = state.catalog.search(&params.q, limit).await?;
    Ok(Json(items))
}

/// Autocomplete suggestions; an empty list on short queries or upstream failure
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestionParams>,
) -> Json<Vec<Suggestion>> {
    Json(recommendations::suggest(state.catalog.as_ref(), &params.q).await)
}

/// Recommendations for the best catalog match of a free-text query
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if request.query.trim().is_empty() {
        return Err(AppError::InvalidInput("query cannot be empty".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        query = %request.query,
        "Processing recommendation request"
    );

    let session = recommendations::recommend_for_query(
        state.catalog.as_ref(),
        &state.seeds,
        &state.ranking,
        &request.query,
        request.sort,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = session.recommendations.len(),
        "Recommendation request completed"
    );

    Ok(Json(RecommendationResponse {
        reference: session.reference,
        recommendations: recommendations::render(session.recommendations),
    }))
}

/// Re-orders a list returned earlier by `recommend`, without recomputing similarity
pub async fn sort_recommendations(
    Json(request): Json<SortRequest>,
) -> Json<Vec<RecommendationView>> {
    let mut list = RecommendationList::from(request.recommendations);
    resort(&mut list, request.key);
    Json(recommendations::render(list))
}
