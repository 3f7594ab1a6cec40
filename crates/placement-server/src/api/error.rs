use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients. Core failures collapse to a generic 500.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Failed to generate report")]
    ReportFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::MalformedPayload => StatusCode::BAD_REQUEST,
            ApiError::ReportFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<placement_core::Error> for ApiError {
    fn from(err: placement_core::Error) -> Self {
        use placement_core::Error;

        match err {
            Error::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            Error::Jwt(_) => ApiError::Unauthorized("Invalid token".to_string()),
            Error::Forbidden(msg) => ApiError::Forbidden(msg),
            other => {
                log::error!("Error generating report: {}", other);
                ApiError::ReportFailed
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
