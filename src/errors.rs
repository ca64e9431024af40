use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::TransitionError;
use crate::services::scheduling::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

// The db layer reports through anyhow; at the HTTP boundary that is always a
// server-side failure.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Transition(_) => StatusCode::CONFLICT,
        };

        let body = match &self {
            // Field map as data so the form can highlight every problem
            AppError::Validation(errors) => {
                serde_json::json!({ "error": "validation failed", "fields": errors })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
