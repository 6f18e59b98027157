use serde::Serialize;

use super::market::Market;
use super::record::CanonicalKey;

/// Lookup-only back-link from a market to the event that groups it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRef {
    pub id: u64,
    pub slug: String,
    pub title: String,
}

/// A nested market of an event: either fully resolved, or a marker for a
/// market whose lookup failed while the rest of the event succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarketRef {
    Resolved(Market),
    Failed {
        id: Option<u64>,
        slug: Option<String>,
        error: String,
    },
}

impl MarketRef {
    pub fn market(&self) -> Option<&Market> {
        match self {
            MarketRef::Resolved(market) => Some(market),
            MarketRef::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MarketRef::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub neg_risk_market_id: Option<String>,
    pub is_neg_risk: bool,
    pub markets: Vec<MarketRef>,
}

impl Event {
    pub fn canonical_key(&self) -> CanonicalKey {
        CanonicalKey::Event(self.id)
    }

    pub fn event_ref(&self) -> EventRef {
        EventRef {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
        }
    }

    /// Resolved markets still open for trading.
    pub fn active_markets(&self) -> impl Iterator<Item = &Market> {
        self.markets
            .iter()
            .filter_map(MarketRef::market)
            .filter(|m| m.active)
    }

    pub fn failed_markets(&self) -> usize {
        self.markets.iter().filter(|m| m.is_failed()).count()
    }
}
