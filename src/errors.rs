use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::lookup::ResolutionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<ResolutionError> for AppError {
    fn from(e: ResolutionError) -> Self {
        match e {
            ResolutionError::InvalidIdentifier(_) => AppError::BadRequest(e.to_string()),
            ResolutionError::NotFound(_) => AppError::NotFound(e.to_string()),
            ResolutionError::UpstreamFailure { .. } | ResolutionError::Normalization { .. } => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}
