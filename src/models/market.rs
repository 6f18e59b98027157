use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::event::EventRef;
use super::record::CanonicalKey;

/// CLOB token id. Kept as the upstream decimal string: values run to ~78
/// digits and do not fit any fixed-width integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tradable outcome of a market, e.g. "Yes" with its token and price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub label: String,
    /// Absent until the market is listed on the order book.
    pub token_id: Option<TokenId>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: u64,
    pub slug: String,
    pub question: String,
    pub condition_id: Option<String>,
    pub question_id: Option<String>,
    /// Upstream order; token ids are paired with labels by position.
    pub outcomes: Vec<Outcome>,
    pub event_ref: Option<EventRef>,
    /// Short label inside a grouped event, e.g. the candidate name.
    pub group_item_title: Option<String>,
    pub is_neg_risk: bool,
    pub neg_risk_market_id: Option<String>,
    pub active: bool,
    pub closed: bool,
    pub archived: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub volume: Option<Decimal>,
    pub liquidity: Option<Decimal>,
}

impl Market {
    pub fn canonical_key(&self) -> CanonicalKey {
        CanonicalKey::Market(self.id)
    }

    pub fn token_ids(&self) -> impl Iterator<Item = &TokenId> {
        self.outcomes.iter().filter_map(|o| o.token_id.as_ref())
    }

    /// The outcome a token id represents, e.g. "Yes" or "No".
    pub fn outcome_for_token(&self, token_id: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.token_id.as_ref().is_some_and(|t| t.as_str() == token_id))
    }

    /// Every identifier that the candidate lookup order resolves to this
    /// market: numeric id, slug, condition id, question id and token ids.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases = vec![self.id.to_string(), self.slug.clone()];
        aliases.extend(self.condition_id.iter().cloned());
        aliases.extend(self.question_id.iter().cloned());
        aliases.extend(self.token_ids().map(|t| t.as_str().to_string()));
        aliases
    }
}
