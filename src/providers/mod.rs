//! Upstream provider clients.
//!
//! # Responsibilities
//! - Build provider-specific requests (auth headers, query layout)
//! - Decode raw provider payloads into private serde types
//! - Map them into the unified [`crate::catalog`] shapes
//!
//! # Data Flow
//! ```text
//! handler → provider client (Unsplash, Pixabay, TMDB, ...)
//!     → client.rs (timeout, retries, metrics)
//!     → raw payload → catalog type
//! ```
//!
//! # Design Decisions
//! - One struct per provider; each owns a clone of the shared client
//! - Missing keys are detected before any network call
//! - Path segments are appended with `url` so ids cannot escape the path

use url::Url;

pub mod client;
pub mod error;
pub mod freepik;
pub mod iconfinder;
pub mod openverse;
pub mod pexels;
pub mod pixabay;
pub mod stats;
pub mod tmdb;
pub mod unsplash;

pub use crate::catalog::RawId;
pub use client::UpstreamClient;
pub use error::{ProviderError, ProviderResult};
pub use stats::{ProviderSnapshot, ProviderStats};

/// Search parameters shared by every paginated provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            query: query.into(),
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Zero-based item offset of the first result on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

/// Join `segments` onto a provider base URL, percent-encoding each one.
pub(crate) fn endpoint(
    provider: &'static str,
    base_url: &str,
    segments: &[&str],
) -> ProviderResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ProviderError::InvalidInput(format!("{provider} base URL invalid: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidInput(format!("{provider} base URL cannot hold a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// First non-blank value, the way `a || b` picks in a JSON payload.
pub(crate) fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}
