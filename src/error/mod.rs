use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Status returned to our own client for a failed upstream call.
    ///
    /// Rate limiting and missing dates pass through; every other upstream
    /// failure is a bad gateway from the caller's point of view.
    fn upstream_status(err: &UpstreamError) -> StatusCode {
        match err {
            UpstreamError::Status(s) if *s == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                StatusCode::TOO_MANY_REQUESTS
            }
            UpstreamError::Status(s) if *s == reqwest::StatusCode::NOT_FOUND => {
                StatusCode::NOT_FOUND
            }
            UpstreamError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            AppError::Upstream(e) => {
                let status = Self::upstream_status(&e);
                if status.is_server_error() {
                    tracing::error!(error = ?e, "Upstream picture request failed");
                }
                (status, e.to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
