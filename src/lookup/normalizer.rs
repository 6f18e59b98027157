use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::query::ResourceKind;
use crate::models::{Event, EventRef, Market, Outcome, TokenId};
use crate::polymarket::types::{parse_decimal, GammaEvent, GammaEventStub, GammaMarket};

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),

    #[error("{labels} outcome labels but {tokens} token ids")]
    MisalignedOutcomes { labels: usize, tokens: usize },

    #[error("malformed {resource} payload: {source}")]
    Malformed {
        resource: ResourceKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected an object or a list, got {0}")]
    UnexpectedShape(&'static str),
}

/// A nested market of an event, to be resolved on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedMarket {
    pub id: Option<u64>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Market(Market),
    /// Event with an empty `markets` list; `nested` is filled in by fan-out.
    Event { event: Event, nested: Vec<NestedMarket> },
}

/// Select the single entity in an upstream response.
///
/// List endpoints answer with an array (empty when nothing matched); id
/// endpoints answer with the object itself. `Ok(None)` means not found.
pub fn unwrap_payload(raw: &Value) -> Result<Option<&Value>, NormalizationError> {
    match raw {
        Value::Null => Ok(None),
        Value::Array(items) => Ok(items.first().filter(|item| !item.is_null())),
        Value::Object(_) => Ok(Some(raw)),
        Value::Bool(_) => Err(NormalizationError::UnexpectedShape("a boolean")),
        Value::Number(_) => Err(NormalizationError::UnexpectedShape("a number")),
        Value::String(_) => Err(NormalizationError::UnexpectedShape("a string")),
    }
}

/// Map one upstream entity into its canonical record.
pub fn normalize(resource: ResourceKind, raw: &Value) -> Result<Normalized, NormalizationError> {
    match resource {
        ResourceKind::Markets => normalize_market(raw).map(Normalized::Market),
        ResourceKind::Events => {
            let (event, nested) = normalize_event(raw)?;
            Ok(Normalized::Event { event, nested })
        }
    }
}

pub fn normalize_market(raw: &Value) -> Result<Market, NormalizationError> {
    let market = GammaMarket::deserialize(raw).map_err(|source| NormalizationError::Malformed {
        resource: ResourceKind::Markets,
        source,
    })?;

    let id = market
        .id
        .ok_or(NormalizationError::MissingRequiredField("id"))?;
    let slug = non_empty(market.slug).ok_or(NormalizationError::MissingRequiredField("slug"))?;

    let outcomes = pair_outcomes(
        market.outcomes.unwrap_or_default(),
        market.clob_token_ids.unwrap_or_default(),
        market.outcome_prices.unwrap_or_default(),
    )?;

    let event_ref = market
        .events
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(event_ref_from_stub);

    Ok(Market {
        id,
        slug,
        question: market.question.unwrap_or_default(),
        condition_id: non_empty(market.condition_id),
        question_id: non_empty(market.question_id),
        outcomes,
        event_ref,
        group_item_title: non_empty(market.group_item_title),
        is_neg_risk: market.neg_risk.unwrap_or(false),
        neg_risk_market_id: non_empty(market.neg_risk_market_id),
        active: market.active.unwrap_or(false),
        closed: market.closed.unwrap_or(false),
        archived: market.archived.unwrap_or(false),
        start_date: market.start_date.as_deref().and_then(parse_timestamp),
        end_date: market.end_date.as_deref().and_then(parse_timestamp),
        volume: market.volume,
        liquidity: market.liquidity,
    })
}

pub fn normalize_event(raw: &Value) -> Result<(Event, Vec<NestedMarket>), NormalizationError> {
    let event = GammaEvent::deserialize(raw).map_err(|source| NormalizationError::Malformed {
        resource: ResourceKind::Events,
        source,
    })?;

    let id = event
        .id
        .ok_or(NormalizationError::MissingRequiredField("id"))?;
    let slug = non_empty(event.slug).ok_or(NormalizationError::MissingRequiredField("slug"))?;

    let nested = event
        .markets
        .unwrap_or_default()
        .into_iter()
        .map(|m| NestedMarket {
            id: m.id,
            slug: non_empty(m.slug),
        })
        .collect();

    Ok((
        Event {
            id,
            slug,
            title: event.title.unwrap_or_default(),
            neg_risk_market_id: non_empty(event.neg_risk_market_id),
            is_neg_risk: event.neg_risk.unwrap_or(false),
            markets: Vec::new(),
        },
        nested,
    ))
}

/// Pair labels with token ids and prices by position, never by value.
fn pair_outcomes(
    labels: Vec<String>,
    token_ids: Vec<String>,
    prices: Vec<String>,
) -> Result<Vec<Outcome>, NormalizationError> {
    if !token_ids.is_empty() && token_ids.len() != labels.len() {
        return Err(NormalizationError::MisalignedOutcomes {
            labels: labels.len(),
            tokens: token_ids.len(),
        });
    }

    let mut token_ids = token_ids.into_iter();
    let mut prices = prices.into_iter();

    Ok(labels
        .into_iter()
        .map(|label| Outcome {
            label,
            token_id: token_ids.next().map(TokenId::new),
            price: prices.next().as_deref().and_then(parse_decimal),
        })
        .collect())
}

fn event_ref_from_stub(stub: GammaEventStub) -> Option<EventRef> {
    Some(EventRef {
        id: stub.id?,
        slug: non_empty(stub.slug)?,
        title: stub.title.unwrap_or_default(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Gamma dates are RFC 3339, occasionally a bare `YYYY-MM-DD`.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}
