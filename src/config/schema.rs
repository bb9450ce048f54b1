//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the media hub.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the media hub.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HubConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for upstream calls.
    pub retries: RetryConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Security hardening settings.
    pub security: SecurityConfig,

    /// Admin surface settings.
    pub admin: AdminConfig,

    /// Search and catalog providers.
    pub providers: ProvidersConfig,

    /// RapidAPI-hosted downloaders.
    pub rapidapi: RapidApiConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Inbound request timeout (until response headers) in seconds.
    pub request_secs: u64,

    /// Per-attempt timeout for upstream provider calls in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
            upstream_secs: 20,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Percentage of upstream calls that can be retries (retry budget).
    /// e.g., 0.1 for 10% budget.
    pub budget_ratio: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
            budget_ratio: 0.1,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Sustained requests per second per client IP.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 20,
            burst_size: 40,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Hosts the image download proxy may fetch from (exact match).
    pub allowed_image_hosts: Vec<String>,

    /// Allow `mediaUrl` downloads that target loopback/private hosts.
    pub allow_private_media_hosts: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
            allowed_image_hosts: vec![
                "images.unsplash.com".to_string(),
                "images.pexels.com".to_string(),
            ],
            allow_private_media_hosts: false,
        }
    }
}

/// Admin dashboard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin endpoints.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin bind address.
    pub bind_address: String,
}

pub const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_ADMIN_KEY.to_string(),
            bind_address: "127.0.0.1:3001".to_string(),
        }
    }
}

/// Endpoint and credential for a single upstream provider.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProviderEndpoint {
    /// Base URL without a trailing slash; empty means the provider's public default.
    #[serde(default)]
    pub base_url: String,

    /// API key; `None` means the provider is not configured.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ProviderEndpoint {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: None,
        }
    }

    /// The API key, if one is set and non-blank.
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Search and catalog providers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub unsplash: ProviderEndpoint,
    pub pexels: ProviderEndpoint,
    pub pixabay: ProviderEndpoint,
    pub openverse: ProviderEndpoint,
    pub iconfinder: ProviderEndpoint,
    pub freepik: ProviderEndpoint,
    pub tmdb: ProviderEndpoint,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            unsplash: ProviderEndpoint::new("https://api.unsplash.com"),
            pexels: ProviderEndpoint::new("https://api.pexels.com"),
            pixabay: ProviderEndpoint::new("https://pixabay.com"),
            openverse: ProviderEndpoint::new("https://api.openverse.org"),
            iconfinder: ProviderEndpoint::new("https://api.iconfinder.com"),
            freepik: ProviderEndpoint::new("https://api.freepik.com"),
            tmdb: ProviderEndpoint::new("https://api.themoviedb.org"),
        }
    }
}

impl ProvidersConfig {
    /// Fill empty base URLs with the public endpoints and trim trailing slashes.
    pub fn resolve_base_urls(&mut self) {
        let defaults = Self::default();
        let pairs = [
            (&mut self.unsplash, defaults.unsplash),
            (&mut self.pexels, defaults.pexels),
            (&mut self.pixabay, defaults.pixabay),
            (&mut self.openverse, defaults.openverse),
            (&mut self.iconfinder, defaults.iconfinder),
            (&mut self.freepik, defaults.freepik),
            (&mut self.tmdb, defaults.tmdb),
        ];
        for (endpoint, default) in pairs {
            if endpoint.base_url.trim().is_empty() {
                endpoint.base_url = default.base_url;
            }
            endpoint.base_url = endpoint.base_url.trim_end_matches('/').to_string();
        }
    }
}

/// A RapidAPI-hosted service: where to send requests and which host header to claim.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RapidApiService {
    /// Base URL without a trailing slash; empty means `https://{host}`.
    #[serde(default)]
    pub base_url: String,

    /// Value of the `x-rapidapi-host` header.
    pub host: String,
}

impl RapidApiService {
    pub fn for_host(host: &str) -> Self {
        Self {
            base_url: format!("https://{}", host),
            host: host.to_string(),
        }
    }

    fn resolve_base_url(&mut self) {
        if self.base_url.trim().is_empty() {
            self.base_url = format!("https://{}", self.host);
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
    }
}

/// RapidAPI-hosted downloaders sharing one key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RapidApiConfig {
    /// Shared RapidAPI key; `None` means downloaders are not configured.
    pub api_key: Option<String>,

    pub youtube: RapidApiService,
    pub instagram: RapidApiService,
    pub tiktok: RapidApiService,

    /// Movie downloader; it has no public default host.
    pub vidu: Option<RapidApiService>,
}

impl RapidApiConfig {
    /// Derive empty base URLs from the host header value.
    pub fn resolve_base_urls(&mut self) {
        self.youtube.resolve_base_url();
        self.instagram.resolve_base_url();
        self.tiktok.resolve_base_url();
        if let Some(vidu) = self.vidu.as_mut() {
            vidu.resolve_base_url();
        }
    }

    /// The API key, if one is set and non-blank.
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for RapidApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            youtube: RapidApiService::for_host("youtube-media-downloader.p.rapidapi.com"),
            instagram: RapidApiService::for_host("instagram120.p.rapidapi.com"),
            tiktok: RapidApiService::for_host("tiktok-video-no-watermark2.p.rapidapi.com"),
            vidu: None,
        }
    }
}
