use std::fmt;

use serde::Serialize;

use super::classifier::IdentifierKind;

/// Upstream resource a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Events,
    Markets,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Events => "events",
            ResourceKind::Markets => "markets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field a query matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Id,
    Slug,
    ConditionId,
    QuestionId,
    TokenId,
}

impl QueryKind {
    /// Gamma query parameter for list lookups. `Id` is addressed by path.
    fn param(&self) -> Option<&'static str> {
        match self {
            QueryKind::Id => None,
            QueryKind::Slug => Some("slug"),
            QueryKind::ConditionId => Some("condition_ids"),
            QueryKind::QuestionId => Some("question_ids"),
            QueryKind::TokenId => Some("clob_token_ids"),
        }
    }
}

/// One candidate upstream lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QuerySpec {
    pub resource: ResourceKind,
    pub by: QueryKind,
    pub value: String,
}

/// Request target for a [`QuerySpec`], relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Option<(&'static str, String)>,
}

impl QuerySpec {
    pub fn new(resource: ResourceKind, by: QueryKind, value: impl Into<String>) -> Self {
        Self {
            resource,
            by,
            value: value.into(),
        }
    }

    pub fn market_by_id(id: u64) -> Self {
        Self::new(ResourceKind::Markets, QueryKind::Id, id.to_string())
    }

    /// `GET /markets/551142` for ids, `GET /markets?slug=…` for everything else.
    pub fn endpoint(&self) -> Endpoint {
        match self.by.param() {
            None => Endpoint {
                path: format!("/{}/{}", self.resource, self.value),
                query: None,
            },
            Some(param) => Endpoint {
                path: format!("/{}", self.resource),
                query: Some((param, self.value.clone())),
            },
        }
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.by.param() {
            None => write!(f, "{}/{}", self.resource, self.value),
            Some(param) => write!(f, "{}?{}={}", self.resource, param, self.value),
        }
    }
}

/// Ordered candidate queries for a classified identifier.
///
/// Slugs and numeric ids are ambiguous between markets and events. Markets
/// are tried first because they are far more numerous; this is a heuristic,
/// not a guarantee that the intended entity is the one matched. Hex ids try
/// the condition id before the question id.
pub fn build_query(kind: IdentifierKind, value: &str) -> Vec<QuerySpec> {
    use QueryKind::*;
    use ResourceKind::*;

    let candidates: &[(ResourceKind, QueryKind)] = match kind {
        IdentifierKind::Slug => &[(Markets, Slug), (Events, Slug)],
        IdentifierKind::NumericId => &[(Markets, Id), (Events, Id)],
        IdentifierKind::ConditionOrQuestionId => &[(Markets, ConditionId), (Markets, QuestionId)],
        IdentifierKind::TokenId => &[(Markets, TokenId)],
    };

    candidates
        .iter()
        .map(|&(resource, by)| QuerySpec::new(resource, by, value))
        .collect()
}
