//! TMDB movie listings and the Vidu movie downloader.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::MoviePage;
use crate::http::request::{non_blank, page_param};
use crate::http::response::ApiError;
use crate::http::state::AppState;
use crate::providers::tmdb::genre_id;
use crate::providers::ProviderResult;

const TMDB_FAILED: &str = "Failed to fetch from TMDB";

#[derive(Debug, Default, Deserialize)]
pub struct MovieParams {
    pub page: Option<String>,
    pub query: Option<String>,
    pub genre: Option<String>,
}

impl MovieParams {
    fn page(&self) -> u32 {
        page_param(self.page.as_deref())
    }
}

fn listing(result: ProviderResult<MoviePage>) -> Result<Json<MoviePage>, ApiError> {
    result.map(Json).map_err(|err| {
        tracing::error!(error = %err, "TMDB request failed");
        ApiError::from_provider(&err, TMDB_FAILED)
    })
}

/// `GET /api/movies/popular`
pub async fn popular(State(state): State<AppState>, Query(params): Query<MovieParams>) -> Result<Json<MoviePage>, ApiError> {
    listing(state.services().tmdb.popular(params.page()).await)
}

/// `GET /api/movies/top`
pub async fn top_rated(State(state): State<AppState>, Query(params): Query<MovieParams>) -> Result<Json<MoviePage>, ApiError> {
    listing(state.services().tmdb.top_rated(params.page()).await)
}

/// `GET /api/movies/trending`
pub async fn trending(State(state): State<AppState>, Query(params): Query<MovieParams>) -> Result<Json<MoviePage>, ApiError> {
    listing(state.services().tmdb.trending(params.page()).await)
}

/// `GET /api/movies/search`
pub async fn search(State(state): State<AppState>, Query(params): Query<MovieParams>) -> Result<Json<MoviePage>, ApiError> {
    let query = non_blank(params.query.as_deref())
        .ok_or_else(|| ApiError::bad_request("Query parameter is required"))?;
    listing(state.services().tmdb.search(query, params.page()).await)
}

/// `GET /api/movies/category`
pub async fn category(State(state): State<AppState>, Query(params): Query<MovieParams>) -> Result<Json<MoviePage>, ApiError> {
    let genre = non_blank(params.genre.as_deref())
        .ok_or_else(|| ApiError::bad_request("Genre parameter is required"))?;
    let id = genre_id(genre).ok_or_else(|| ApiError::bad_request(format!("Unknown genre: {}", genre)))?;

    let Json(mut page) = listing(state.services().tmdb.discover(id, params.page()).await)?;
    page.genre = Some(genre.to_string());
    Ok(Json(page))
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlBody {
    pub url: Option<String>,
}

/// Pull a non-blank `url` out of a JSON body.
pub(crate) fn required_url(body: Result<Json<UrlBody>, JsonRejection>) -> Result<String, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::bad_request("Invalid JSON body")
    })?;
    non_blank(body.url.as_deref())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("URL is required"))
}

/// `POST /api/movies`: pass a Vidu link to the downloader and echo its answer.
pub async fn vidu_download(
    State(state): State<AppState>,
    body: Result<Json<UrlBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let url = required_url(body)?;
    let services = state.services();
    if !services.vidu.is_configured() {
        return Err(ApiError::internal("Vidu download service not configured"));
    }

    services.vidu.download(&url).await.map(Json).map_err(|err| {
        tracing::error!(error = %err, "Vidu download failed");
        ApiError::Internal(err.to_string())
    })
}
