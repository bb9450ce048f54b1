//! Media Hub
//!
//! One HTTP surface over stock photo, design asset, movie and social media
//! download providers.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                  MEDIA HUB                    │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌───────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ handlers │──▶│ providers │───┼──▶ Unsplash, Pexels,
//!                      │  │ server  │   │          │   │  content  │   │    Pixabay, OpenVerse,
//!                      │  └─────────┘   └────┬─────┘   └─────┬─────┘   │    IconFinder, Freepik,
//!                      │                     │               │         │    TMDB, RapidAPI
//!   Client Response    │  ┌─────────┐   ┌────▼─────┐         │         │
//!   ◀──────────────────┼──│download │◀──│ catalog  │◀────────┘         │
//!                      │  │ stream  │   │  merge   │                   │
//!                      │  └─────────┘   └──────────┘                   │
//!                      │                                               │
//!                      │  config (hot reload) · observability ·        │
//!                      │  security · resilience · lifecycle · admin    │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::net::TcpListener;

use media_hub::admin::setup_admin_router;
use media_hub::config::watcher::ConfigWatcher;
use media_hub::config::{load_config, HubConfig};
use media_hub::http::HttpServer;
use media_hub::lifecycle::{signals, Shutdown};
use media_hub::net::tls::load_tls_config;
use media_hub::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "media-hub")]
#[command(about = "Media search and download hub", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "media-hub.toml")]
    config: PathBuf,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    if args.check {
        println!("Configuration OK: {}", args.config.display());
        return Ok(());
    }

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "media-hub starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        rate_limit = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    let (watcher, config_updates) = ConfigWatcher::new(&args.config);
    // Dropping the handle stops the watch.
    let _watch_guard = match watcher.run() {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!(error = %e, "Config hot reload disabled");
            None
        }
    };

    let server = HttpServer::new(config.clone())?;

    if config.admin.enabled {
        spawn_admin(&config, server.state(), &shutdown).await?;
    }

    match &config.listener.tls {
        Some(tls) => {
            let addr: SocketAddr = config.listener.bind_address.parse()?;
            let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
            server.run_tls(addr, rustls, config_updates, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, config_updates, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn spawn_admin(
    config: &HubConfig,
    state: media_hub::http::AppState,
    shutdown: &Shutdown,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(&config.admin.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Admin API listening");

    let router = setup_admin_router(state);
    let mut stop = shutdown.subscribe();
    tokio::spawn(async move {
        let served = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await;
        if let Err(e) = served {
            tracing::error!(error = %e, "Admin server failed");
        }
    });
    Ok(())
}
