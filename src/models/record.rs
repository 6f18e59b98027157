use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::event::Event;
use super::market::Market;
use crate::lookup::IdentifierKind;

/// Stable cache key for a resolved entity, independent of the identifier
/// the caller supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalKey {
    Market(u64),
    Event(u64),
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalKey::Market(id) => write!(f, "market:{id}"),
            CanonicalKey::Event(id) => write!(f, "event:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Event(Event),
    Market(Market),
}

impl Entity {
    pub fn canonical_key(&self) -> CanonicalKey {
        match self {
            Entity::Event(event) => event.canonical_key(),
            Entity::Market(market) => market.canonical_key(),
        }
    }
}

/// Outcome of one successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRecord {
    pub input: String,
    pub kind: IdentifierKind,
    pub resolved_at: DateTime<Utc>,
    pub entity: Entity,
}

impl ResolvedRecord {
    pub fn new(input: impl Into<String>, kind: IdentifierKind, entity: Entity) -> Self {
        Self {
            input: input.into(),
            kind,
            resolved_at: Utc::now(),
            entity,
        }
    }

    pub fn canonical_key(&self) -> CanonicalKey {
        self.entity.canonical_key()
    }

    /// Same record, attributed to a different caller-supplied identifier.
    pub fn with_input(mut self, input: impl Into<String>, kind: IdentifierKind) -> Self {
        self.input = input.into();
        self.kind = kind;
        self
    }

    pub fn market(&self) -> Option<&Market> {
        match &self.entity {
            Entity::Market(market) => Some(market),
            Entity::Event(_) => None,
        }
    }

    pub fn event(&self) -> Option<&Event> {
        match &self.entity {
            Entity::Event(event) => Some(event),
            Entity::Market(_) => None,
        }
    }
}
