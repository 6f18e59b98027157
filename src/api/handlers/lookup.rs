use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::lookup::IdentifierKind;
use crate::models::ResolvedRecord;
use crate::AppState;

#[derive(Serialize)]
pub struct LookupResponse {
    pub success: bool,
    pub data: ResolvedRecord,
    /// For token-id lookups, the outcome the token represents ("Yes"/"No").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_outcome: Option<String>,
}

pub async fn resolve(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<LookupResponse>, AppError> {
    let record = state.resolver.resolve(&identifier).await?;

    let matched_outcome = match (record.kind, record.market()) {
        (IdentifierKind::TokenId, Some(market)) => market
            .outcome_for_token(identifier.trim())
            .map(|o| o.label.clone()),
        _ => None,
    };

    Ok(Json(LookupResponse {
        success: true,
        data: record,
        matched_outcome,
    }))
}
