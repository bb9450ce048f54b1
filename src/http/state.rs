//! Shared handler state and the hot-swappable service generation.
//!
//! # Data Flow
//! ```text
//! HubConfig
//!     → Services::build (one UpstreamClient, one client per provider)
//!     → ArcSwap inside AppState
//!     → handlers call AppState::services() once per request
//! ```
//!
//! # Design Decisions
//! - A reload builds a whole new generation and swaps it atomically
//! - In-flight requests finish on the generation they started with
//! - Provider statistics outlive generations

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::config::HubConfig;
use crate::content::{Instagram, RapidApiEndpoint, TikTok, Vidu, YouTube};
use crate::providers::freepik::Freepik;
use crate::providers::iconfinder::Iconfinder;
use crate::providers::openverse::Openverse;
use crate::providers::pexels::Pexels;
use crate::providers::pixabay::Pixabay;
use crate::providers::tmdb::Tmdb;
use crate::providers::unsplash::Unsplash;
use crate::providers::{ProviderResult, ProviderStats, UpstreamClient};

/// Everything built from one configuration.
pub struct Services {
    pub config: Arc<HubConfig>,
    pub generation: u64,
    pub client: UpstreamClient,
    pub unsplash: Unsplash,
    pub pexels: Pexels,
    pub pixabay: Pixabay,
    pub openverse: Openverse,
    pub iconfinder: Iconfinder,
    pub freepik: Freepik,
    pub tmdb: Tmdb,
    pub youtube: YouTube,
    pub instagram: Instagram,
    pub tiktok: TikTok,
    pub vidu: Vidu,
}

impl Services {
    pub fn build(config: HubConfig, stats: Arc<ProviderStats>, generation: u64) -> ProviderResult<Self> {
        let client = UpstreamClient::new(&config.timeouts, config.retries.clone(), stats)?;
        let providers = &config.providers;
        let rapidapi = &config.rapidapi;

        Ok(Self {
            unsplash: Unsplash::new(client.clone(), &providers.unsplash),
            pexels: Pexels::new(client.clone(), &providers.pexels),
            pixabay: Pixabay::new(client.clone(), &providers.pixabay),
            openverse: Openverse::new(client.clone(), &providers.openverse),
            iconfinder: Iconfinder::new(client.clone(), &providers.iconfinder),
            freepik: Freepik::new(client.clone(), &providers.freepik),
            tmdb: Tmdb::new(client.clone(), &providers.tmdb),
            youtube: YouTube::new(client.clone(), RapidApiEndpoint::new(rapidapi, &rapidapi.youtube)),
            instagram: Instagram::new(client.clone(), RapidApiEndpoint::new(rapidapi, &rapidapi.instagram)),
            tiktok: TikTok::new(client.clone(), RapidApiEndpoint::new(rapidapi, &rapidapi.tiktok)),
            vidu: Vidu::new(
                client.clone(),
                rapidapi.vidu.as_ref().map(|service| RapidApiEndpoint::new(rapidapi, service)),
            ),
            client,
            generation,
            config: Arc::new(config),
        })
    }

    /// `(provider, configured)` for every upstream the hub talks to.
    pub fn configured(&self) -> Vec<(&'static str, bool)> {
        use crate::content::{instagram, tiktok, vidu, youtube};
        use crate::providers::{freepik, iconfinder, openverse, pexels, pixabay, tmdb, unsplash};

        vec![
            (unsplash::NAME, self.unsplash.is_configured()),
            (pexels::NAME, self.pexels.is_configured()),
            (pixabay::NAME, self.pixabay.is_configured()),
            (openverse::NAME, self.openverse.is_configured()),
            (iconfinder::NAME, self.iconfinder.is_configured()),
            (freepik::NAME, self.freepik.is_configured()),
            (tmdb::NAME, self.tmdb.is_configured()),
            (youtube::NAME, self.youtube.is_configured()),
            (instagram::NAME, self.instagram.is_configured()),
            (tiktok::NAME, self.tiktok.is_configured()),
            (vidu::NAME, self.vidu.is_configured()),
        ]
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<Services>>,
    pub stats: Arc<ProviderStats>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(services: Services, stats: Arc<ProviderStats>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(services)),
            stats,
            started_at: Instant::now(),
        }
    }

    /// The current generation. Hold the `Arc` for the whole request.
    pub fn services(&self) -> Arc<Services> {
        self.inner.load_full()
    }

    /// Build a generation from `config` and make it current.
    pub fn reload(&self, config: HubConfig) -> ProviderResult<u64> {
        let generation = self.inner.load().generation + 1;
        let services = Services::build(config, self.stats.clone(), generation)?;
        self.inner.store(Arc::new(services));
        Ok(generation)
    }
}
