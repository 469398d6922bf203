use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::layout::FontSize;

/// Fitting failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    /// Recoverable: the text does not fit at any size in the range.
    #[error("text too big: no size between {min} and {max} fits")]
    NoFit { min: FontSize, max: FontSize },

    /// Fatal: not even the placeholder fits at the smallest size.
    #[error("could not fit one character on a {width}x{height} display at {min}")]
    TerminalNoFit {
        width: u32,
        height: u32,
        min: FontSize,
    },
}

/// Error type for the update endpoint.
/// Implements `IntoResponse` so handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Fit(e) => {
                tracing::error!("Fit error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "FIT_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
