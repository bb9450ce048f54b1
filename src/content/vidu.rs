//! Vidu movie downloader. The upstream answer is passed through untouched,
//! error bodies included.

use reqwest::Method;
use serde_json::Value;

use crate::content::RapidApiEndpoint;
use crate::providers::{ProviderError, ProviderResult, UpstreamClient};

pub const NAME: &str = "Vidu";

/// Client for the RapidAPI Vidu service. The host has no public default, so
/// the endpoint is optional.
#[derive(Clone)]
pub struct Vidu {
    client: UpstreamClient,
    endpoint: Option<RapidApiEndpoint>,
}

impl Vidu {
    pub fn new(client: UpstreamClient, endpoint: Option<RapidApiEndpoint>) -> Self {
        Self { client, endpoint }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.as_ref().is_some_and(RapidApiEndpoint::is_configured)
    }

    pub async fn download(&self, url: &str) -> ProviderResult<Value> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(ProviderError::NotConfigured { provider: NAME })?;
        let request = endpoint
            .request(&self.client, NAME, Method::POST, &["download"])?
            .json(&serde_json::json!({ "url": url }));
        self.client.exchange_json(NAME, request).await
    }
}
