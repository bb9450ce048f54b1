//! Stock photo search and image download.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::catalog::{ImagePage, ImageSource};
use crate::download::{check_image_host, decode_image_url, image_filename, image_response, normalize_image_type};
use crate::http::request::{non_blank, page_param, per_page_param};
use crate::http::response::ApiError;
use crate::http::state::AppState;
use crate::providers::{ProviderError, SearchQuery};

const DEFAULT_QUERY: &str = "nature";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub source: Option<String>,
}

/// `GET /api/search`
pub async fn search_images(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ImagePage>, ApiError> {
    let source = ImageSource::from_param(params.source.as_deref());
    let query = SearchQuery::new(
        non_blank(params.query.as_deref()).unwrap_or(DEFAULT_QUERY),
        page_param(params.page.as_deref()),
        per_page_param(params.per_page.as_deref()),
    );

    let services = state.services();
    let result = match source {
        ImageSource::Unsplash => services.unsplash.search(&query).await,
        ImageSource::Pexels => services.pexels.search(&query).await,
    };

    result.map(Json).map_err(|err| {
        tracing::error!(source = source.as_str(), query = %query.query, error = %err, "Image search failed");
        match err {
            ProviderError::NotConfigured { .. } => ApiError::Internal(err.to_string()),
            other => ApiError::Detailed {
                message: "Failed to fetch images".to_string(),
                details: other.to_string(),
            },
        }
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    pub url: Option<String>,
    pub id: Option<String>,
    pub source: Option<String>,
}

/// `GET /api/image/download`
///
/// `url` is the base64 of an image URL on an allow-listed host.
pub async fn download_image(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let encoded = non_blank(params.url.as_deref())
        .ok_or_else(|| ApiError::bad_request("url parameter is required"))?;
    let url = decode_image_url(encoded)?;

    let services = state.services();
    check_image_host(&url, &services.config.security.allowed_image_hosts).map_err(|err| {
        tracing::warn!(host = ?url.host_str(), "Rejected image download host");
        ApiError::from(err)
    })?;

    let upstream = services
        .client
        .fetch_media("image-download", url.as_str())
        .await
        .map_err(|err| match err.status() {
            Some(status) => ApiError::Status {
                status,
                message: "Failed to fetch image".to_string(),
            },
            None => {
                tracing::error!(url = %url, error = %err, "Image download failed");
                ApiError::internal("Failed to download image")
            }
        })?;

    let kind = normalize_image_type(crate::download::upstream_content_type(&upstream).as_deref());
    let body = upstream.bytes().await.map_err(|err| {
        tracing::error!(url = %url, error = %err, "Image body transfer failed");
        ApiError::internal("Failed to download image")
    })?;

    let source = ImageSource::from_param(params.source.as_deref());
    let filename = image_filename(source.as_str(), params.id.as_deref(), kind.extension);
    Ok(image_response(body, kind, &filename))
}
