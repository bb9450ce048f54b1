//! Provider error definitions.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to an upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider needs a key (or host) that is not configured.
    #[error("{provider} API key not configured")]
    NotConfigured { provider: &'static str },

    /// Connection, TLS, timeout or body transfer failure.
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} API error: {status}")]
    Status {
        provider: &'static str,
        status: StatusCode,
    },

    /// The provider answered 2xx but the body did not match the expected shape.
    #[error("{provider} returned an unexpected payload: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered but reported that it could not serve the request.
    #[error("{provider}: {message}")]
    Rejected {
        provider: &'static str,
        message: String,
    },

    /// Client input that cannot be forwarded.
    #[error("{0}")]
    InvalidInput(String),
}

impl ProviderError {
    pub fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        ProviderError::Transport { provider, source }
    }

    /// Upstream status, if the failure was a non-success response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
