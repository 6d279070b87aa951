//! Axum server and routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use shop_types::{ApiSearchRequest, ProductSearch, SearchError, SearchResponse, SearchResponseData};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

pub struct AppState {
    pub search: Arc<dyn ProductSearch + Send + Sync>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/product/search", post(handle_search))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApiSearchRequest>,
) -> Json<SearchResponse> {
    let query_id = Uuid::new_v4().to_string();
    tracing::info!(query_id = %query_id, mode = %req.mode, query = %req.query, "search request");

    let data = |results| {
        Some(SearchResponseData {
            query_id: query_id.clone(),
            mode: req.mode,
            results,
        })
    };
    match state.search.get_results(&req.query, req.mode).await {
        Ok(results) => Json(SearchResponse {
            code: 200,
            message: "Search completed successfully".to_string(),
            data: data(results),
        }),
        Err(SearchError::InsufficientCandidates(reason)) => Json(SearchResponse {
            code: 200,
            message: format!("No results: {}", reason),
            data: data(Vec::new()),
        }),
        Err(e @ SearchError::RetrievalUnavailable(_)) => Json(SearchResponse {
            code: 503,
            message: e.to_string(),
            data: None,
        }),
        Err(e @ SearchError::MissingReviewData(_)) => {
            tracing::error!(query_id = %query_id, error = %e, "retrieval and review store disagree");
            Json(SearchResponse {
                code: 500,
                message: e.to_string(),
                data: None,
            })
        }
    }
}

async fn handle_health() -> &'static str {
    "ok"
}
