pub mod api;
pub mod config;
pub mod errors;
pub mod lookup;
pub mod metrics;
pub mod models;
pub mod polymarket;

use std::sync::Arc;

use crate::lookup::Resolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
