//! Metrics collection and exposition.
//!
//! # Metrics
//! - `media_hub_requests_total` (counter): inbound requests by route, status
//! - `media_hub_request_duration_seconds` (histogram): inbound latency by route
//! - `media_hub_upstream_requests_total` (counter): provider calls by provider, outcome
//! - `media_hub_upstream_duration_seconds` (histogram): provider latency
//! - `media_hub_upstream_retries_total` (counter): retries by provider
//! - `media_hub_rate_limited_total` (counter): requests rejected by the limiter
//! - `media_hub_download_bytes_total` (counter): bytes proxied by download kind
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!(
        "media_hub_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("media_hub_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(provider: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "media_hub_upstream_requests_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("media_hub_upstream_duration_seconds", "provider" => provider)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_retry(provider: &'static str) {
    counter!("media_hub_upstream_retries_total", "provider" => provider).increment(1);
}

pub fn record_rate_limited() {
    counter!("media_hub_rate_limited_total").increment(1);
}

pub fn record_download_bytes(kind: &'static str, bytes: u64) {
    counter!("media_hub_download_bytes_total", "kind" => kind).increment(bytes);
}
