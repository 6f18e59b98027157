use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let cache_entries = state.resolver.cache().len().await;
    Json(json!({ "status": "healthy", "cache_entries": cache_entries }))
}
