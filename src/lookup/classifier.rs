use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Pure-digit inputs longer than this are order-book token ids; shorter ones
/// are market or event ids.
const MAX_NUMERIC_ID_LEN: usize = 15;

/// Hex digits following the `0x` prefix of a condition or question id.
const CONTRACT_ID_HEX_LEN: usize = 64;

/// Probable identifier kind, judged from the shape of the input alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Event or market slug.
    Slug,
    /// Event or market numeric id.
    NumericId,
    /// `0x` + 64 hex digits. Condition ids and question ids share this shape.
    ConditionOrQuestionId,
    /// Large decimal CLOB token id.
    TokenId,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Slug => "slug",
            IdentifierKind::NumericId => "numeric_id",
            IdentifierKind::ConditionOrQuestionId => "condition_or_question_id",
            IdentifierKind::TokenId => "token_id",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("identifier is empty")]
    EmptyInput,

    #[error("malformed hex id: expected 0x followed by 64 hex digits, got {0} digits")]
    MalformedHexId(usize),
}

/// A classified identifier: the detected kind plus the value to query with.
///
/// The value is trimmed, and hex ids are lower-cased so that `0xABC…` and
/// `0xabc…` share cache aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub value: String,
}

impl Identifier {
    pub fn parse(input: &str) -> Result<Self, ClassificationError> {
        let trimmed = input.trim();
        let kind = classify(trimmed)?;
        let value = match kind {
            IdentifierKind::ConditionOrQuestionId => trimmed.to_ascii_lowercase(),
            _ => trimmed.to_string(),
        };
        Ok(Self { kind, value })
    }
}

/// Classify a raw identifier by its structure.
///
/// Rules, first match wins:
/// 1. `0x` (or `0X`) + exactly 64 hex digits: condition id or question id.
/// 2. All digits, longer than 15: token id.
/// 3. All digits, 15 or fewer: market or event id.
/// 4. Anything else: slug.
///
/// `0x` followed only by hex digits of the wrong length is rejected rather
/// than treated as a slug.
pub fn classify(input: &str) -> Result<IdentifierKind, ClassificationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ClassificationError::EmptyInput);
    }

    if let Some(hex) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            if hex.len() == CONTRACT_ID_HEX_LEN {
                return Ok(IdentifierKind::ConditionOrQuestionId);
            }
            return Err(ClassificationError::MalformedHexId(hex.len()));
        }
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        if input.len() > MAX_NUMERIC_ID_LEN {
            return Ok(IdentifierKind::TokenId);
        }
        return Ok(IdentifierKind::NumericId);
    }

    Ok(IdentifierKind::Slug)
}
