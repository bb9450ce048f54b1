//! Design asset search, details and download redirects.
//!
//! Search fans out to every provider that serves the requested type and has
//! what it needs to run. A provider that fails contributes nothing; the page
//! is built from whoever answered.

use std::future::Future;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{merge_assets, Asset, AssetPage, AssetSource, AssetType};
use crate::http::request::{non_blank, page_param, per_page_param};
use crate::http::response::ApiError;
use crate::http::state::AppState;
use crate::providers::{freepik, iconfinder, openverse, pixabay, ProviderError, ProviderResult, SearchQuery};

const DEFAULT_QUERY: &str = "design";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSearchParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Run a provider search if `enabled`; failures are logged and yield nothing.
async fn collect<F>(provider: &'static str, enabled: bool, search: F) -> Vec<Asset>
where
    F: Future<Output = ProviderResult<Vec<Asset>>>,
{
    if !enabled {
        return Vec::new();
    }
    match search.await {
        Ok(assets) => assets,
        Err(err) => {
            tracing::warn!(provider, error = %err, "Asset search provider failed");
            Vec::new()
        }
    }
}

/// `GET /api/assets/search`
pub async fn search_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetSearchParams>,
) -> Result<Json<AssetPage>, ApiError> {
    let services = state.services();
    if !services.pixabay.is_configured() && !services.freepik.is_configured() {
        return Err(ApiError::NoAssets("No API keys configured for asset search".to_string()));
    }

    let kind = AssetType::from_param(params.kind.as_deref());
    let query = SearchQuery::new(
        non_blank(params.query.as_deref()).unwrap_or(DEFAULT_QUERY),
        page_param(params.page.as_deref()),
        per_page_param(params.per_page.as_deref()),
    );
    if let Some(category) = non_blank(params.category.as_deref()) {
        tracing::debug!(category, "Asset category filter is not forwarded to providers");
    }

    let (from_pixabay, from_openverse, from_iconfinder, from_freepik) = tokio::join!(
        collect(
            pixabay::NAME,
            services.pixabay.is_configured() && kind.wants(pixabay::KINDS),
            services.pixabay.search(&query, kind),
        ),
        collect(
            openverse::NAME,
            kind.wants(openverse::KINDS),
            services.openverse.search(&query),
        ),
        collect(
            iconfinder::NAME,
            services.iconfinder.is_configured() && kind.wants(iconfinder::KINDS),
            services.iconfinder.search(&query),
        ),
        collect(
            freepik::NAME,
            services.freepik.is_configured() && kind.wants(freepik::KINDS),
            services.freepik.search(&query, kind),
        ),
    );

    let results: Vec<Asset> = from_pixabay
        .into_iter()
        .chain(from_openverse)
        .chain(from_iconfinder)
        .chain(from_freepik)
        .collect();
    let merged = merge_assets(results, query.page, query.per_page);

    Ok(Json(AssetPage {
        assets: merged.assets,
        total: merged.total,
        page: query.page,
        per_page: query.per_page,
        total_pages: merged.total_pages,
        query: query.query,
        kind,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetLookupParams {
    pub id: Option<String>,
    pub source: Option<String>,
    pub format: Option<String>,
}

impl AssetLookupParams {
    /// `(id, source)`; an unknown source yields `None` for the source.
    fn required(&self) -> Result<(&str, Option<AssetSource>), ApiError> {
        match (non_blank(self.id.as_deref()), non_blank(self.source.as_deref())) {
            (Some(id), Some(source)) => Ok((id, AssetSource::parse(source))),
            _ => Err(ApiError::bad_request("id and source parameters are required")),
        }
    }
}

/// Missing keys keep their message; an upstream rejection reads as "not there".
fn lookup_error(err: ProviderError, not_found: &str, failed: &str) -> ApiError {
    match err {
        ProviderError::NotConfigured { .. } => ApiError::Internal(err.to_string()),
        ProviderError::Status { .. } => ApiError::not_found(not_found),
        other => {
            tracing::error!(error = %other, "Asset lookup failed");
            ApiError::BadGateway(failed.to_string())
        }
    }
}

/// `GET /api/assets/details`
pub async fn asset_details(
    State(state): State<AppState>,
    Query(params): Query<AssetLookupParams>,
) -> Result<Response, ApiError> {
    const NOT_FOUND: &str = "Asset not found";
    let (id, source) = params.required()?;
    let services = state.services();

    let result = match source {
        Some(source @ AssetSource::Pixabay) => services.pixabay.details(source.strip_prefix(id)).await,
        Some(source @ AssetSource::Openverse) => services.openverse.details(source.strip_prefix(id)).await,
        Some(source @ AssetSource::Iconfinder) => services.iconfinder.details(source.strip_prefix(id)).await,
        _ => Ok(None),
    };

    match result.map_err(|err| lookup_error(err, NOT_FOUND, "Failed to fetch asset details"))? {
        Some(asset) => Ok(Json(json!({ "asset": asset })).into_response()),
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// `GET /api/assets/download`: 307 to the provider's file.
pub async fn asset_download(
    State(state): State<AppState>,
    Query(params): Query<AssetLookupParams>,
) -> Result<Response, ApiError> {
    const NOT_FOUND: &str = "Download URL not available";
    let (id, source) = params.required()?;
    let format = non_blank(params.format.as_deref()).unwrap_or("jpg");
    let services = state.services();

    let result = match source {
        Some(source @ AssetSource::Pixabay) => services.pixabay.download_url(source.strip_prefix(id)).await,
        Some(source @ AssetSource::Openverse) => services.openverse.download_url(source.strip_prefix(id)).await,
        Some(source @ AssetSource::Iconfinder) => {
            services.iconfinder.download_url(source.strip_prefix(id), format).await
        }
        _ => Ok(None),
    };

    match result.map_err(|err| lookup_error(err, NOT_FOUND, "Failed to resolve download URL"))? {
        Some(url) => Ok(Redirect::temporary(&url).into_response()),
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}
