use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use super::query::QuerySpec;

/// Result of a single upstream lookup that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Found(Value),
    NotFound,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Remote market-data query interface.
///
/// Implementations return `NotFound` only for a legitimate miss. Timeouts,
/// server errors and undecodable bodies are `Err` so the resolver stops
/// instead of falling through to the next candidate.
pub trait MarketDataSource: Send + Sync {
    fn fetch<'a>(&'a self, query: &'a QuerySpec) -> BoxFuture<'a, Result<Fetched, FetchError>>;
}
