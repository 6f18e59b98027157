use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics::gauge;

use crate::AppState;

/// Prometheus scrape endpoint. The cache size gauge is sampled on scrape.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    let cache_entries = state.resolver.cache().len().await;
    gauge!("lookup_cache_entries").set(cache_entries as f64);

    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], state.metrics_handle.render())
}
