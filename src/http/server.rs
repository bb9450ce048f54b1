//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, rate limit)
//! - Apply configuration reloads by swapping the service generation
//! - Serve plain TCP or TLS with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::HubConfig;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::http::state::{AppState, Services};
use crate::http::{assets, content, images, movies};
use crate::observability::metrics;
use crate::providers::{ProviderResult, ProviderStats};
use crate::security::headers;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};

/// How long open connections get to finish once shutdown starts.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP server for the media hub.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: HubConfig) -> ProviderResult<Self> {
        let stats = Arc::new(ProviderStats::new());
        let router_config = config.clone();
        let services = Services::build(config, stats.clone(), 0)?;
        let state = AppState::new(services, stats);

        let router = Self::build_router(&router_config, state.clone());
        Ok(Self { router, state })
    }

    /// Shared state, e.g. for the admin router.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers are only read here; a reload does not change them.
    #[allow(deprecated)]
    fn build_router(config: &HubConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(health))
            .route("/api/search", get(images::search_images))
            .route("/api/image/download", get(images::download_image))
            .route("/api/assets/search", get(assets::search_assets))
            .route("/api/assets/details", get(assets::asset_details))
            .route("/api/assets/download", get(assets::asset_download))
            .route("/api/movies", post(movies::vidu_download))
            .route("/api/movies/popular", get(movies::popular))
            .route("/api/movies/top", get(movies::top_rated))
            .route("/api/movies/trending", get(movies::trending))
            .route("/api/movies/search", get(movies::search))
            .route("/api/movies/category", get(movies::category))
            .route(
                "/api/content/youtube",
                post(content::youtube_info).get(content::youtube_download),
            )
            .route(
                "/api/content/instagram",
                post(content::instagram_info).get(content::instagram_download),
            )
            .route(
                "/api/content/tiktok",
                post(content::tiktok_info).get(content::tiktok_download),
            )
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }
        if config.security.enable_headers {
            router = headers::apply(router);
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
    }

    /// Apply configuration updates until the channel closes.
    fn spawn_reloader(state: AppState, mut config_updates: mpsc::UnboundedReceiver<HubConfig>) {
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match state.reload(config) {
                    Ok(generation) => tracing::info!(generation, "Configuration reloaded"),
                    Err(e) => tracing::error!(
                        error = %e,
                        "Failed to apply reloaded config. Keeping current configuration."
                    ),
                }
            }
        });
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<HubConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        Self::spawn_reloader(self.state.clone(), config_updates);

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<HubConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        Self::spawn_reloader(self.state.clone(), config_updates);

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls).handle(handle).serve(app).await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// `GET /health`
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Record per-route request metrics, labelled by the matched route template.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16(), start);
    response
}
