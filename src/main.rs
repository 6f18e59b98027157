use std::sync::Arc;

use polylookup::api::router::create_router;
use polylookup::config::AppConfig;
use polylookup::lookup::Resolver;
use polylookup::polymarket::GammaClient;
use polylookup::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr();
    let metrics_handle = polylookup::metrics::init_metrics()?;

    let gamma = GammaClient::with_options(
        &config.gamma_api_url,
        config.request_timeout(),
        &config.user_agent,
    )?;
    tracing::info!(
        gamma_api_url = %gamma.base_url(),
        timeout_secs = config.request_timeout_secs,
        fan_out = config.fan_out_concurrency,
        "Gamma client ready"
    );

    let resolver = Resolver::new(Arc::new(gamma)).with_fan_out(config.fan_out_concurrency);

    let state = AppState {
        resolver: Arc::new(resolver),
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Lookup server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
