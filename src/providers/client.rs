//! Shared HTTP client for upstream providers.
//!
//! # Responsibilities
//! - Own the pooled `reqwest::Client` for one services generation
//! - Apply the per-attempt timeout to API calls
//! - Retry idempotent calls with backoff under the retry budget
//! - Record metrics and provider counters for every call

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::schema::{RetryConfig, TimeoutConfig};
use crate::observability::metrics;
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::stats::ProviderStats;
use crate::resilience::backoff::backoff_delay;
use crate::resilience::retries::{is_retryable, RetryBudget};

const USER_AGENT: &str = concat!("media-hub/", env!("CARGO_PKG_VERSION"));

/// Browser-like agent for media CDNs that reject unknown clients.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Upstream HTTP client with timeouts, retries and accounting.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    timeout: Duration,
    retry: RetryConfig,
    budget: Arc<RetryBudget>,
    stats: Arc<ProviderStats>,
}

impl UpstreamClient {
    /// Build a client. Media downloads share the pool but carry no total
    /// timeout, so only the connect timeout is set on the client itself.
    pub fn new(
        timeouts: &TimeoutConfig,
        retry: RetryConfig,
        stats: Arc<ProviderStats>,
    ) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::transport("http-client", e))?;

        let budget = Arc::new(RetryBudget::new(retry.budget_ratio, 10));

        Ok(Self {
            http,
            timeout: Duration::from_secs(timeouts.upstream_secs),
            retry,
            budget,
            stats,
        })
    }

    /// The underlying reqwest client, for building requests.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send an API request and require a 2xx answer.
    pub async fn send(&self, provider: &'static str, builder: RequestBuilder) -> ProviderResult<Response> {
        let request = builder
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProviderError::transport(provider, e))?;
        self.execute(provider, request).await
    }

    /// Send an API request and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        builder: RequestBuilder,
    ) -> ProviderResult<T> {
        let response = self.send(provider, builder).await?;
        response.json::<T>().await.map_err(|source| {
            self.stats.record_failure(provider);
            ProviderError::Decode { provider, source }
        })
    }

    /// Send an API request once and decode its JSON body whatever the
    /// status. For services whose error payloads are forwarded to callers.
    pub async fn exchange_json(
        &self,
        provider: &'static str,
        builder: RequestBuilder,
    ) -> ProviderResult<serde_json::Value> {
        let request = builder
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProviderError::transport(provider, e))?;

        self.budget.record_request();
        self.stats.record_request(provider);

        let start = Instant::now();
        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let outcome = if e.is_timeout() { "timeout" } else { "transport" };
                metrics::record_upstream(provider, outcome, start);
                tracing::warn!(provider, error = %e, "Upstream request failed");
                self.stats.record_failure(provider);
                return Err(ProviderError::transport(provider, e));
            }
        };

        let status = response.status();
        let outcome = if status.is_success() { "success" } else { "status" };
        metrics::record_upstream(provider, outcome, start);
        if !status.is_success() {
            tracing::debug!(provider, %status, "Forwarding upstream error body");
        }

        response.json().await.map_err(|source| {
            self.stats.record_failure(provider);
            ProviderError::Decode { provider, source }
        })
    }

    /// Open a media body for streaming. No total timeout applies.
    pub async fn fetch_media(&self, provider: &'static str, url: &str) -> ProviderResult<Response> {
        let request = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .build()
            .map_err(|e| ProviderError::transport(provider, e))?;
        self.execute(provider, request).await
    }

    async fn execute(&self, provider: &'static str, request: Request) -> ProviderResult<Response> {
        let method = request.method().clone();
        let max_attempts = if self.retry.enabled {
            self.retry.max_attempts.max(1)
        } else {
            1
        };

        self.budget.record_request();
        self.stats.record_request(provider);

        let mut next = Some(request);
        let mut attempt = 0;
        while let Some(current) = next.take() {
            attempt += 1;
            if attempt < max_attempts {
                next = current.try_clone();
            }

            let start = Instant::now();
            let (error, status) = match self.http.execute(current).await {
                Ok(response) if response.status().is_success() => {
                    metrics::record_upstream(provider, "success", start);
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    metrics::record_upstream(provider, "status", start);
                    (ProviderError::Status { provider, status }, Some(status))
                }
                Err(e) => {
                    let outcome = if e.is_timeout() { "timeout" } else { "transport" };
                    metrics::record_upstream(provider, outcome, start);
                    (ProviderError::transport(provider, e), None)
                }
            };

            if next.is_some() && is_retryable(&method, status) && self.budget.can_retry() {
                let delay = backoff_delay(attempt, &self.retry);
                tracing::info!(
                    provider,
                    attempt,
                    delay = ?delay,
                    error = %error,
                    "Retrying upstream request"
                );
                metrics::record_retry(provider);
                self.stats.record_retry(provider);
                tokio::time::sleep(delay).await;
                continue;
            }

            tracing::warn!(provider, attempt, error = %error, "Upstream request failed");
            self.stats.record_failure(provider);
            return Err(error);
        }

        Err(ProviderError::Rejected {
            provider,
            message: "request could not be attempted".to_string(),
        })
    }
}
