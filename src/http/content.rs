//! YouTube, Instagram and TikTok endpoints.
//!
//! Each platform has a `POST` that returns display info for a link and a
//! `GET` that streams the media itself. A `GET` with neither `url` nor
//! `mediaUrl` describes the endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::content::{instagram, tiktok, timestamp_millis, youtube};
use crate::download::{check_media_url, media_response, upstream_content_type};
use crate::http::movies::{required_url, UrlBody};
use crate::http::request::non_blank;
use crate::http::response::ApiError;
use crate::http::state::{AppState, Services};
use crate::providers::ProviderError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadParams {
    pub url: Option<String>,
    pub itag: Option<String>,
    pub media_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn not_configured(platform: &str) -> ApiError {
    ApiError::Internal(format!("{} download service not configured", platform))
}

/// The `GET` link clients follow to download what a `POST` described.
fn download_link(platform: &str, url: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", url)
        .finish();
    format!("/api/content/{}?{}", platform, query)
}

fn describe(platform: &str, description: &str) -> Response {
    Json(json!({
        "message": format!("{} download API endpoint", platform),
        "methods": ["POST", "GET"],
        "description": description,
    }))
    .into_response()
}

/// Fetch a media URL; an upstream refusal becomes `refused` (400).
async fn open_media(
    services: &Services,
    provider: &'static str,
    url: &str,
    refused: &str,
    failed: &str,
) -> Result<reqwest::Response, ApiError> {
    services.client.fetch_media(provider, url).await.map_err(|err| {
        tracing::warn!(provider, error = %err, "Media fetch failed");
        match err {
            ProviderError::Status { .. } => ApiError::bad_request(refused),
            _ => ApiError::internal(failed),
        }
    })
}

/// Validate a client-supplied `mediaUrl` against the private-address guard.
fn guarded_media_url(services: &Services, raw: &str) -> Result<url::Url, ApiError> {
    check_media_url(raw, services.config.security.allow_private_media_hosts).map_err(|err| {
        tracing::warn!(error = %err, "Rejected media URL");
        ApiError::from(err)
    })
}

// YouTube

/// `POST /api/content/youtube`
pub async fn youtube_info(
    State(state): State<AppState>,
    body: Result<Json<UrlBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let url = required_url(body)?;
    if !youtube::is_youtube_url(&url) {
        return Err(ApiError::bad_request("Invalid YouTube URL"));
    }

    let services = state.services();
    if !services.youtube.is_configured() {
        return Ok(Json(youtube::demo_info()).into_response());
    }

    let video_id = youtube::extract_video_id(&url)
        .ok_or_else(|| ApiError::bad_request("Could not extract video ID from URL"))?;

    let details = services.youtube.details(video_id).await.map_err(|err| {
        tracing::error!(video_id, error = %err, "YouTube details request failed");
        match err {
            ProviderError::Status { .. } => ApiError::bad_request(
                "Could not access this video. It may be private, age-restricted, or unavailable.",
            ),
            _ => ApiError::internal("Failed to fetch video information. Please try again."),
        }
    })?;

    if !details.is_success() || !details.has_title() {
        return Err(ApiError::bad_request("Could not fetch video information"));
    }

    Ok(Json(details.info(video_id, download_link("youtube", &url))).into_response())
}

/// `GET /api/content/youtube`
pub async fn youtube_download(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let Some(url) = non_blank(params.url.as_deref()) else {
        return Ok(Json(json!({
            "message": "YouTube download API endpoint",
            "methods": ["POST", "GET"],
            "description": "POST: Get video info and available formats. GET: Download video",
            "examplePost": { "url": "https://www.youtube.com/watch?v=..." },
        }))
        .into_response());
    };
    if !youtube::is_youtube_url(url) {
        return Err(ApiError::bad_request("Invalid YouTube URL"));
    }

    let services = state.services();
    if !services.youtube.is_configured() {
        return Err(not_configured("YouTube"));
    }
    let video_id =
        youtube::extract_video_id(url).ok_or_else(|| ApiError::bad_request("Could not extract video ID"))?;

    let details = services.youtube.details(video_id).await.map_err(|err| {
        tracing::error!(video_id, error = %err, "YouTube details request failed");
        match err {
            ProviderError::Status { .. } => ApiError::bad_request("Could not fetch download link"),
            _ => ApiError::internal("Failed to download video"),
        }
    })?;
    if !details.is_success() {
        return Err(ApiError::bad_request("No download formats available"));
    }

    let stream = details
        .select_stream(non_blank(params.itag.as_deref()))
        .ok_or_else(|| ApiError::bad_request("Download URL not found for selected format"))?;

    let upstream = open_media(
        &services,
        youtube::NAME,
        &stream.url,
        "Failed to fetch video file",
        "Failed to download video",
    )
    .await?;

    let content_type = upstream_content_type(&upstream).unwrap_or_else(|| {
        let fallback = if stream.extension == "mp3" { "audio/mpeg" } else { "video/mp4" };
        fallback.to_string()
    });
    let filename = format!("{}.{}", details.file_stem(), stream.extension);
    Ok(media_response(upstream, &content_type, &filename, "youtube"))
}

// Instagram

/// `POST /api/content/instagram`
pub async fn instagram_info(
    State(state): State<AppState>,
    body: Result<Json<UrlBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let url = required_url(body)?;
    if !instagram::is_instagram_url(&url) {
        return Err(ApiError::bad_request("Invalid Instagram URL"));
    }

    let services = state.services();
    if !services.instagram.is_configured() {
        return Err(not_configured("Instagram"));
    }

    let shortcode = instagram::extract_shortcode(&url).ok_or_else(|| {
        ApiError::bad_request("Could not extract post ID from URL. Please use a direct post/reel URL.")
    })?;

    let links = services.instagram.links(&url).await.map_err(|err| {
        tracing::error!(shortcode, error = %err, "Instagram links request failed");
        match err {
            ProviderError::Status { .. } => {
                ApiError::bad_request("Could not access this content. It may be private or unavailable.")
            }
            _ => ApiError::internal("Failed to fetch content information. Please try again."),
        }
    })?;

    Ok(Json(links.info(shortcode, download_link("instagram", &url))).into_response())
}

/// `GET /api/content/instagram`
pub async fn instagram_download(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let services = state.services();

    let upstream = if let Some(media_url) = non_blank(params.media_url.as_deref()) {
        let target = guarded_media_url(&services, media_url)?;
        open_media(
            &services,
            instagram::NAME,
            target.as_str(),
            "Failed to fetch media",
            "Failed to download content",
        )
        .await?
    } else if let Some(url) = non_blank(params.url.as_deref()) {
        if !instagram::is_instagram_url(url) {
            return Err(ApiError::bad_request("Invalid Instagram URL"));
        }
        if !services.instagram.is_configured() {
            return Err(not_configured("Instagram"));
        }

        let links = services.instagram.links(url).await.map_err(|err| {
            tracing::error!(error = %err, "Instagram links request failed");
            match err {
                ProviderError::Status { .. } => ApiError::bad_request("Could not fetch download link"),
                _ => ApiError::internal("Failed to download content"),
            }
        })?;
        let media = links
            .first_download_url()
            .ok_or_else(|| ApiError::bad_request("No download URL found"))?;

        open_media(
            &services,
            instagram::NAME,
            &media,
            "Failed to fetch media file",
            "Failed to download content",
        )
        .await?
    } else {
        return Ok(describe("Instagram", "POST: Get content info. GET: Download media"));
    };

    let content_type = upstream_content_type(&upstream).unwrap_or_else(|| "video/mp4".to_string());
    let filename = format!(
        "instagram_{}.{}",
        timestamp_millis(),
        instagram::extension_for(&content_type)
    );
    Ok(media_response(upstream, &content_type, &filename, "instagram"))
}

// TikTok

/// `POST /api/content/tiktok`
pub async fn tiktok_info(
    State(state): State<AppState>,
    body: Result<Json<UrlBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let url = required_url(body)?;
    if !tiktok::is_tiktok_url(&url) {
        return Err(ApiError::bad_request("Invalid TikTok URL"));
    }

    let services = state.services();
    if !services.tiktok.is_configured() {
        return Err(not_configured("TikTok"));
    }

    let response = services.tiktok.video(&url).await.map_err(|err| {
        tracing::error!(error = %err, "TikTok video request failed");
        match err {
            ProviderError::Status { .. } => {
                ApiError::bad_request("Could not access this content. It may be private or unavailable.")
            }
            _ => ApiError::internal("Failed to fetch content information. Please try again."),
        }
    })?;

    let data = response
        .data
        .ok_or_else(|| ApiError::bad_request("Could not fetch content information"))?;
    Ok(Json(data.info()).into_response())
}

/// `GET /api/content/tiktok`
pub async fn tiktok_download(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let services = state.services();

    if let Some(media_url) = non_blank(params.media_url.as_deref()) {
        let target = guarded_media_url(&services, media_url)?;
        let upstream = open_media(
            &services,
            tiktok::NAME,
            target.as_str(),
            "Failed to fetch media",
            "Failed to download content",
        )
        .await?;

        let audio = params.kind.as_deref() == Some("audio");
        let (content_type, extension) = if audio { ("audio/mpeg", "mp3") } else { ("video/mp4", "mp4") };
        let filename = format!("tiktok_{}.{}", timestamp_millis(), extension);
        return Ok(media_response(upstream, content_type, &filename, "tiktok"));
    }

    let Some(url) = non_blank(params.url.as_deref()) else {
        return Ok(describe("TikTok", "POST: Get content info. GET: Download media"));
    };
    if !tiktok::is_tiktok_url(url) {
        return Err(ApiError::bad_request("Invalid TikTok URL"));
    }
    if !services.tiktok.is_configured() {
        return Err(not_configured("TikTok"));
    }

    let response = services.tiktok.video(url).await.map_err(|err| {
        tracing::error!(error = %err, "TikTok video request failed");
        match err {
            ProviderError::Status { .. } => ApiError::bad_request("Could not fetch download link"),
            _ => ApiError::internal("Failed to download content"),
        }
    })?;
    let media = response
        .data
        .and_then(|data| data.best_video_url())
        .ok_or_else(|| ApiError::bad_request("No download URL found"))?;

    let upstream = open_media(
        &services,
        tiktok::NAME,
        &media,
        "Failed to fetch media file",
        "Failed to download content",
    )
    .await?;
    let filename = format!("tiktok_{}.mp4", timestamp_millis());
    Ok(media_response(upstream, "video/mp4", &filename, "tiktok"))
}
