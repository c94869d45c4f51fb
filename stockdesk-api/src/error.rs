//! HTTP error mapping.
//!
//! "No data" is the only condition surfaced as 404. Everything else is a 500
//! whose detail names what was being fetched.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use stockdesk_core::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No data found for symbol: {symbol}")]
    NotFound { symbol: String },

    #[error("Error fetching {what}: {message}")]
    Internal { what: &'static str, message: String },
}

impl ApiError {
    /// Map a pipeline failure while fetching `what` ("stock data", "summary").
    pub fn from_pipeline(what: &'static str, err: PipelineError) -> Self {
        match err {
            PipelineError::NoData { symbol } => ApiError::NotFound { symbol },
            other => ApiError::Internal {
                what,
                message: other.to_string(),
            },
        }
    }

    pub fn internal(what: &'static str, message: impl Into<String>) -> Self {
        ApiError::Internal {
            what,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
