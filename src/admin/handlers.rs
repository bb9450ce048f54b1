use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::AppState;
use crate::providers::ProviderSnapshot;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub config_generation: u64,
}

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub provider: &'static str,
    pub configured: bool,
    pub requests: u64,
    pub failures: u64,
    pub retries: u64,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
        config_generation: state.services().generation,
    })
}

/// Every upstream, whether it has credentials, and its call counters.
pub async fn get_providers(State(state): State<AppState>) -> Json<Vec<ProviderStatus>> {
    let counters: HashMap<String, ProviderSnapshot> = state
        .stats
        .snapshot()
        .into_iter()
        .map(|s| (s.provider.clone(), s))
        .collect();

    let statuses = state
        .services()
        .configured()
        .into_iter()
        .map(|(provider, configured)| {
            let seen = counters.get(provider);
            ProviderStatus {
                provider,
                configured,
                requests: seen.map_or(0, |s| s.requests),
                failures: seen.map_or(0, |s| s.failures),
                retries: seen.map_or(0, |s| s.retries),
            }
        })
        .collect();

    Json(statuses)
}
