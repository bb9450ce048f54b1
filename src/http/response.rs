//! Client-facing error responses.
//!
//! # Responsibilities
//! - Render every failure as JSON with an `error` field
//! - Map provider and guard failures onto status codes
//!
//! # Design Decisions
//! - Handlers pick the client message; the upstream detail goes to the log
//! - Upstream status codes are forwarded only where a route promises it

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::download::GuardError;
use crate::providers::ProviderError;

/// An error returned from a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    BadGateway(String),

    /// An explicit status, e.g. one forwarded from upstream.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// 500 carrying the underlying failure as `details`.
    #[error("{message}: {details}")]
    Detailed { message: String, details: String },

    /// 500 for asset search, shaped like an empty result page.
    #[error("{0}")]
    NoAssets(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Status { status, .. } => *status,
            ApiError::Internal(_) | ApiError::Detailed { .. } | ApiError::NoAssets(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Keep the configuration message for a missing key, otherwise use
    /// `fallback`.
    pub fn from_provider(err: &ProviderError, fallback: &str) -> Self {
        match err {
            ProviderError::NotConfigured { .. } => ApiError::Internal(err.to_string()),
            _ => ApiError::Internal(fallback.to_string()),
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::HostNotAllowed => ApiError::Forbidden(err.to_string()),
            GuardError::PrivateHost => ApiError::Forbidden(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Detailed { message, details } => json!({ "error": message, "details": details }),
            ApiError::NoAssets(message) => json!({ "error": message, "assets": [], "total": 0 }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
