use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API clients. Artifact-load failures never appear here:
/// they are absorbed at startup by the demo-mode fallback.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected before the pipeline ran. The message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// Transform or predict failed on a live engine.
    #[error("An error occurred: {0}")]
    Prediction(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Prediction(_) => "PREDICTION_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.error_code(),
        }));
        (self.status_code(), body).into_response()
    }
}
