use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Field decoding helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Num(u64),
    Str(String),
}

/// Gamma ids arrive as `"538928"` or `538928`.
fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdRepr::Num(n)) => Ok(Some(n)),
        Some(IdRepr::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(IdRepr::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id {s:?}"))),
    }
}

/// Items of a list field that is either a JSON-encoded string such as
/// `"[\"Yes\", \"No\"]"` or a plain array.
fn de_opt_list_items<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Some(Vec::new())),
        Some(Value::String(s)) => serde_json::from_str::<Vec<Value>>(&s)
            .map(Some)
            .map_err(de::Error::custom),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(de::Error::custom(format!("expected list, got {other}"))),
    }
}

/// `outcomes` and `outcomePrices`.
fn de_opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(items) = de_opt_list_items(deserializer)? else {
        return Ok(None);
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(de::Error::custom(format!("unexpected list item {other}"))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// `clobTokenIds`. Token ids exceed every native integer width, so a bare
/// JSON number is only accepted when it still holds every digit (fits in
/// `u64`); anything larger has already been rounded through `f64`.
fn de_opt_token_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(items) = de_opt_list_items(deserializer)? else {
        return Ok(None);
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Number(n) => n.as_u64().map(|v| v.to_string()).ok_or_else(|| {
                de::Error::custom(format!("token id {n} lost precision; expected a string"))
            }),
            other => Err(de::Error::custom(format!("unexpected token id {other}"))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Volumes and liquidity come as strings or numbers; unparseable is absent.
fn de_opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => parse_decimal(&s),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        _ => None,
    })
}

pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

// ---------------------------------------------------------------------------
// Market (Gamma API)
// ---------------------------------------------------------------------------

/// Market object as returned by `/markets` and `/markets/{id}`.
/// Every field is optional here; required fields are enforced by the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default, alias = "questionID")]
    pub question_id: Option<String>,
    /// JSON array of outcome labels, e.g. ["Yes","No"]
    #[serde(default, deserialize_with = "de_opt_string_list")]
    pub outcomes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de_opt_string_list")]
    pub outcome_prices: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de_opt_token_list")]
    pub clob_token_ids: Option<Vec<String>>,
    #[serde(default)]
    pub group_item_title: Option<String>,
    #[serde(default)]
    pub neg_risk: Option<bool>,
    #[serde(default, alias = "negRiskMarketID")]
    pub neg_risk_market_id: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    pub volume: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    pub liquidity: Option<Decimal>,
    #[serde(default)]
    pub events: Option<Vec<GammaEventStub>>,
}

/// Parent event summary embedded in a market payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GammaEventStub {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// Event (Gamma API)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaEvent {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub neg_risk: Option<bool>,
    #[serde(default, alias = "negRiskMarketID")]
    pub neg_risk_market_id: Option<String>,
    #[serde(default)]
    pub markets: Option<Vec<GammaNestedMarket>>,
}

/// Only the identifiers of a nested market are read; each one is looked up
/// on its own during event fan-out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GammaNestedMarket {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
}
