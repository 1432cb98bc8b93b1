//! Structured errors for the feed server.
//!
//! Feed paths are only rejected outright when the pace segment is malformed;
//! everything the assembler can describe is returned as an error feed instead.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Structured errors for the feed server.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Path segment that cannot be read as a pace.
    #[error("INVALID_PACE: {0}")]
    InvalidPace(String),

    /// Plan token outside the known set, when building a feed URL.
    #[error("INVALID_PLAN: {0}")]
    InvalidPlan(String),

    /// Start date that is not `YYYY-MM-DD`, when building a feed URL.
    #[error("INVALID_DATE: {0}")]
    InvalidDate(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::InvalidPace(_) | WebError::InvalidPlan(_) | WebError::InvalidDate(_) => StatusCode::BAD_REQUEST,
        };

        tracing::debug!(error = %self, "rejected request");

        (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], self.to_string()).into_response()
    }
}
