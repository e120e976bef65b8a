use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::pipeline::GenerationError;

/// Handler error. Produces `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Generation(err) = &self;
        let (status, code) = match err {
            GenerationError::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            GenerationError::InFlight => (StatusCode::CONFLICT, "GENERATION_IN_PROGRESS"),
            GenerationError::Completion(_) | GenerationError::Parse(_) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED")
            }
        };

        let body = json!({
            "error": err.user_message(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
