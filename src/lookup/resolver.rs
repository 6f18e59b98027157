use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use metrics::{counter, histogram};
use serde_json::Value;
use thiserror::Error;

use super::cache::ResultCache;
use super::classifier::{ClassificationError, Identifier, IdentifierKind};
use super::normalizer::{self, NestedMarket, NormalizationError, Normalized};
use super::query::{build_query, QuerySpec};
use super::source::{FetchError, Fetched, MarketDataSource};
use crate::models::{CanonicalKey, Entity, EventRef, Market, MarketRef, ResolvedRecord};

const DEFAULT_FAN_OUT: usize = 8;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] ClassificationError),

    #[error("upstream failure querying {query}: {source}")]
    UpstreamFailure {
        query: QuerySpec,
        #[source]
        source: FetchError,
    },

    #[error("unusable upstream record from {query}: {source}")]
    Normalization {
        query: QuerySpec,
        #[source]
        source: NormalizationError,
    },

    #[error("no market or event matches {0:?}")]
    NotFound(String),
}

/// Resolves any supported identifier to a fully cross-referenced record.
///
/// Sequence per call: classify, consult the cache, try each candidate query
/// in order, normalize the first hit, and for events resolve every nested
/// market. Dropping the returned future abandons in-flight nested lookups
/// at their next fetch.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn MarketDataSource>,
    cache: ResultCache,
    fan_out: usize,
}

impl Resolver {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            cache: ResultCache::new(),
            fan_out: DEFAULT_FAN_OUT,
        }
    }

    /// Maximum nested market lookups in flight per event.
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out.max(1);
        self
    }

    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Drop all cached resolutions. Returns the number of entries removed.
    pub async fn clear_cache(&self) -> usize {
        let cleared = self.cache.clear().await;
        tracing::info!(cleared, "Lookup cache cleared");
        cleared
    }

    pub async fn resolve(&self, input: &str) -> Result<ResolvedRecord, ResolutionError> {
        let started = Instant::now();
        counter!("lookups_total").increment(1);

        let result = self.resolve_inner(input).await;

        histogram!("lookup_latency_seconds").record(started.elapsed().as_secs_f64());
        result
    }

    async fn resolve_inner(&self, input: &str) -> Result<ResolvedRecord, ResolutionError> {
        let identifier = Identifier::parse(input)?;

        if let Some(hit) = self.cache.get(&identifier.value).await {
            counter!("lookup_cache_hits_total").increment(1);
            tracing::debug!(
                input = %identifier.value,
                key = %hit.canonical_key(),
                "Cache hit"
            );
            return Ok(hit.with_input(input, identifier.kind));
        }
        counter!("lookup_cache_misses_total").increment(1);

        for query in build_query(identifier.kind, &identifier.value) {
            tracing::debug!(input = %identifier.value, query = %query, "Trying candidate");

            let Some(raw) = self.fetch(&query).await? else {
                continue;
            };
            let Some(payload) = select_payload(&query, &raw)? else {
                continue;
            };

            let normalized = normalizer::normalize(query.resource, payload).map_err(|source| {
                ResolutionError::Normalization {
                    query: query.clone(),
                    source,
                }
            })?;

            let record = match normalized {
                Normalized::Market(market) => {
                    let mut aliases = market.aliases();
                    aliases.push(identifier.value.clone());
                    let record = ResolvedRecord::new(input, identifier.kind, Entity::Market(market));
                    self.cache
                        .put(record.canonical_key(), record.clone(), aliases)
                        .await;
                    record
                }
                Normalized::Event { mut event, nested } => {
                    let (markets, oldest_reused) =
                        self.resolve_nested(&event.event_ref(), nested).await;
                    event.markets = markets;
                    let record = ResolvedRecord::new(input, identifier.kind, Entity::Event(event));

                    // The event entry must not outlive market data reused
                    // from the cache.
                    let inserted_at = oldest_reused
                        .map_or(record.resolved_at, |t| t.min(record.resolved_at));
                    // Event ids and slugs may also name a market, so only the
                    // input that actually fell through to the event is aliased.
                    self.cache
                        .put_at(
                            record.canonical_key(),
                            record.clone(),
                            [identifier.value.clone()],
                            inserted_at,
                        )
                        .await;
                    record
                }
            };

            tracing::info!(
                input = %identifier.value,
                kind = %identifier.kind,
                query = %query,
                key = %record.canonical_key(),
                "Identifier resolved"
            );
            return Ok(record);
        }

        Err(ResolutionError::NotFound(identifier.value))
    }

    /// `Ok(None)` on a legitimate miss, `Err` on anything that should stop
    /// the candidate walk.
    async fn fetch(&self, query: &QuerySpec) -> Result<Option<Value>, ResolutionError> {
        counter!("upstream_requests_total").increment(1);
        match self.source.fetch(query).await {
            Ok(Fetched::Found(raw)) => Ok(Some(raw)),
            Ok(Fetched::NotFound) => Ok(None),
            Err(source) => {
                counter!("upstream_failures_total").increment(1);
                tracing::warn!(query = %query, error = %source, "Upstream query failed");
                Err(ResolutionError::UpstreamFailure {
                    query: query.clone(),
                    source,
                })
            }
        }
    }

    /// Resolve every nested market of an event, keeping upstream order.
    /// Individual failures become `MarketRef::Failed` entries.
    ///
    /// Also returns the insertion time of the oldest market served from the
    /// cache, if any.
    async fn resolve_nested(
        &self,
        parent: &EventRef,
        nested: Vec<NestedMarket>,
    ) -> (Vec<MarketRef>, Option<DateTime<Utc>>) {
        let resolved: Vec<(MarketRef, Option<DateTime<Utc>>)> = stream::iter(nested)
            .map(|entry| self.resolve_nested_market(parent, entry))
            .buffered(self.fan_out)
            .collect()
            .await;

        let oldest_reused = resolved.iter().filter_map(|(_, reused)| *reused).min();
        let markets = resolved.into_iter().map(|(market, _)| market).collect();
        (markets, oldest_reused)
    }

    async fn resolve_nested_market(
        &self,
        parent: &EventRef,
        entry: NestedMarket,
    ) -> (MarketRef, Option<DateTime<Utc>>) {
        let Some(id) = entry.id else {
            let failed = MarketRef::Failed {
                id: None,
                slug: entry.slug,
                error: NormalizationError::MissingRequiredField("id").to_string(),
            };
            return (failed, None);
        };

        match self.market_for_event(id, parent).await {
            Ok((market, reused)) => (MarketRef::Resolved(market), reused),
            Err(e) => {
                counter!("nested_market_failures_total").increment(1);
                tracing::warn!(
                    event_id = parent.id,
                    market_id = id,
                    error = %e,
                    "Nested market lookup failed"
                );
                let failed = MarketRef::Failed {
                    id: Some(id),
                    slug: entry.slug,
                    error: e.to_string(),
                };
                (failed, None)
            }
        }
    }

    /// Cache, fetch by id and normalize one nested market, back-linked to
    /// its parent event. A cache hit also reports when it was cached.
    async fn market_for_event(
        &self,
        id: u64,
        parent: &EventRef,
    ) -> Result<(Market, Option<DateTime<Utc>>), ResolutionError> {
        if let Some(hit) = self.cache.entry(&CanonicalKey::Market(id)).await {
            if let Entity::Market(mut market) = hit.record.entity {
                counter!("lookup_cache_hits_total").increment(1);
                market.event_ref = Some(parent.clone());
                return Ok((market, Some(hit.inserted_at)));
            }
        }

        let query = QuerySpec::market_by_id(id);
        let not_found = || ResolutionError::NotFound(id.to_string());

        let raw = self.fetch(&query).await?.ok_or_else(not_found)?;
        let payload = select_payload(&query, &raw)?.ok_or_else(not_found)?;

        let mut market = normalizer::normalize_market(payload).map_err(|source| {
            ResolutionError::Normalization {
                query: query.clone(),
                source,
            }
        })?;
        market.event_ref = Some(parent.clone());

        let record = ResolvedRecord::new(
            id.to_string(),
            IdentifierKind::NumericId,
            Entity::Market(market.clone()),
        );
        self.cache
            .put(record.canonical_key(), record, market.aliases())
            .await;
        Ok((market, None))
    }
}

/// Pick the entity out of a raw response; a response of the wrong JSON type
/// is an upstream failure, not a miss.
fn select_payload<'v>(
    query: &QuerySpec,
    raw: &'v Value,
) -> Result<Option<&'v Value>, ResolutionError> {
    normalizer::unwrap_payload(raw).map_err(|e| ResolutionError::UpstreamFailure {
        query: query.clone(),
        source: FetchError::Malformed(e.to_string()),
    })
}
