use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all lookup metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("lookups_total").absolute(0);
    counter!("lookup_cache_hits_total").absolute(0);
    counter!("lookup_cache_misses_total").absolute(0);
    counter!("upstream_requests_total").absolute(0);
    counter!("upstream_failures_total").absolute(0);
    counter!("nested_market_failures_total").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("lookup_latency_seconds").record(0.0);

    Ok(handle)
}
