use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::lookup::{FetchError, Fetched, MarketDataSource, QuerySpec};

pub const GAMMA_API_BASE: &str = "https://gamma-api.polymarket.com";

/// Gamma API client. Every request is bounded by the client timeout, so a
/// stalled upstream surfaces as `FetchError::Http` rather than a hang.
#[derive(Debug, Clone)]
pub struct GammaClient {
    http: Client,
    base_url: String,
}

impl GammaClient {
    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self::from_client(http, base_url))
    }

    /// Wrap a preconfigured client; its timeout bounds every fetch.
    pub fn from_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a query, e.g. `…/markets?question_ids=0x5ddb…`.
    pub fn url_for(&self, query: &QuerySpec) -> Result<Url, FetchError> {
        let endpoint = query.endpoint();
        let base = format!("{}{}", self.base_url, endpoint.path);
        let url = match &endpoint.query {
            Some((name, value)) => Url::parse_with_params(&base, &[(*name, value.as_str())]),
            None => Url::parse(&base),
        };
        url.map_err(|e| FetchError::Malformed(format!("invalid request URL {base}: {e}")))
    }

    async fn get_json(&self, query: &QuerySpec) -> Result<Fetched, FetchError> {
        let url = self.url_for(query)?;
        tracing::debug!(url = %url, "Gamma request");

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(Fetched::Found(value))
    }
}

impl MarketDataSource for GammaClient {
    fn fetch<'a>(&'a self, query: &'a QuerySpec) -> BoxFuture<'a, Result<Fetched, FetchError>> {
        self.get_json(query).boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode as HttpStatus;
    use axum::response::Html;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::lookup::{QueryKind, ResolutionError, Resolver, ResourceKind};

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn spawn_gamma(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn gamma_router() -> Router {
        Router::new()
            .route(
                "/markets/1",
                get(|| async { Json(json!({ "id": "1", "slug": "one" })) }),
            )
            .route(
                "/markets/503",
                get(|| async { HttpStatus::SERVICE_UNAVAILABLE }),
            )
            .route(
                "/markets/7",
                get(|| async { Html("<html>maintenance</html>") }),
            )
            .route(
                "/markets/9",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(json!({ "id": "9", "slug": "slow" }))
                }),
            )
    }

    /// Same settings as `with_options`, minus any proxy from the environment.
    async fn local_client() -> GammaClient {
        let base = spawn_gamma(gamma_router()).await;
        let http = Client::builder()
            .timeout(Duration::from_secs(1))
            .user_agent("test")
            .no_proxy()
            .build()
            .unwrap();
        GammaClient::from_client(http, &base)
    }

    fn client() -> GammaClient {
        GammaClient::with_options("https://gamma.example/", Duration::from_secs(1), "test").unwrap()
    }

    #[test]
    fn test_url_for_id_lookup() {
        let url = client().url_for(&QuerySpec::market_by_id(551142)).unwrap();
        assert_eq!(url.as_str(), "https://gamma.example/markets/551142");
    }

    #[test]
    fn test_url_for_list_lookup_is_encoded() {
        let query = QuerySpec::new(ResourceKind::Events, QueryKind::Slug, "a slug&x=1");
        let url = client().url_for(&query).unwrap();
        assert_eq!(url.path(), "/events");
        assert_eq!(url.query(), Some("slug=a+slug%26x%3D1"));
    }

    #[test]
    fn test_url_for_token_lookup() {
        let token = "16867679388416061053995436140492438650416184687930130083732571696309100575009";
        let query = QuerySpec::new(ResourceKind::Markets, QueryKind::TokenId, token);
        let url = client().url_for(&query).unwrap();
        assert_eq!(
            url.as_str(),
            format!("https://gamma.example/markets?clob_token_ids={token}")
        );
    }

    #[tokio::test]
    async fn test_fetch_found() {
        let client = local_client().await;
        let fetched = client.fetch(&QuerySpec::market_by_id(1)).await.unwrap();
        assert_eq!(fetched, Fetched::Found(json!({ "id": "1", "slug": "one" })));
    }

    #[tokio::test]
    async fn test_fetch_404_is_not_found() {
        let client = local_client().await;
        let fetched = client.fetch(&QuerySpec::market_by_id(404)).await.unwrap();
        assert_eq!(fetched, Fetched::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_status() {
        let client = local_client().await;
        let err = client.fetch(&QuerySpec::market_by_id(503)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)), "{err:?}");
    }

    #[tokio::test]
    async fn test_fetch_html_body_is_malformed() {
        let client = local_client().await;
        let err = client.fetch(&QuerySpec::market_by_id(7)).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_fetch_past_timeout_is_http_error() {
        let client = local_client().await;
        let err = client.fetch(&QuerySpec::market_by_id(9)).await.unwrap_err();
        match err {
            FetchError::Http(e) => assert!(e.is_timeout(), "{e:?}"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stalled_upstream_surfaces_as_upstream_failure() {
        let resolver = Resolver::new(Arc::new(local_client().await));

        let outcome = tokio::time::timeout(Duration::from_secs(4), resolver.resolve("9"))
            .await
            .expect("client timeout should end the lookup");

        match outcome {
            Err(ResolutionError::UpstreamFailure { query, .. }) => {
                assert_eq!(query, QuerySpec::market_by_id(9));
            }
            other => panic!("expected upstream failure, got {other:?}"),
        }
    }
}
