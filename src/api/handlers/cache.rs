use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

pub async fn clear(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.resolver.clear_cache().await;
    Json(json!({ "success": true, "cleared": cleared }))
}
