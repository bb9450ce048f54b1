//! Social media downloaders backed by RapidAPI.
//!
//! # Responsibilities
//! - Recognise platform URLs and extract their ids
//! - Ask the RapidAPI service for media details
//! - Reshape the answer into the info payload clients render
//! - Choose the media URL a download streams from
//!
//! # Design Decisions
//! - Every service shares one RapidAPI key; hosts differ per platform
//! - Calls are POSTs or single GETs and are never replayed on failure
//!   except where the method is idempotent
//! - Response parsing is tolerant: unknown shapes degrade to "no media"

use reqwest::{Method, RequestBuilder};

use crate::config::{RapidApiConfig, RapidApiService};
use crate::providers::{endpoint, ProviderError, ProviderResult, UpstreamClient};

pub mod instagram;
pub mod tiktok;
pub mod vidu;
pub mod youtube;

pub use instagram::Instagram;
pub use tiktok::TikTok;
pub use vidu::Vidu;
pub use youtube::YouTube;

/// One RapidAPI-hosted service: where it lives and how to authenticate.
#[derive(Debug, Clone)]
pub struct RapidApiEndpoint {
    base_url: String,
    host: String,
    key: Option<String>,
}

impl RapidApiEndpoint {
    pub fn new(config: &RapidApiConfig, service: &RapidApiService) -> Self {
        Self {
            base_url: service.base_url.clone(),
            host: service.host.clone(),
            key: config.key().map(str::to_string),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Start a request carrying the RapidAPI key and host headers.
    pub fn request(
        &self,
        client: &UpstreamClient,
        provider: &'static str,
        method: Method,
        segments: &[&str],
    ) -> ProviderResult<RequestBuilder> {
        let key = self.key.as_deref().ok_or(ProviderError::NotConfigured { provider })?;
        let url = endpoint(provider, &self.base_url, segments)?;
        Ok(client
            .http()
            .request(method, url)
            .header("x-rapidapi-key", key)
            .header("x-rapidapi-host", &self.host))
    }
}

/// Milliseconds since the epoch, used to name downloads.
pub(crate) fn timestamp_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
