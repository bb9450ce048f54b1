//! Shared utilities for integration tests.
//!
//! `start_upstream` serves one axum router that answers the way every
//! provider the hub talks to does. `start_hub` runs the real server against
//! it on an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use media_hub::config::schema::RapidApiService;
use media_hub::config::HubConfig;
use media_hub::http::AppState;
use media_hub::{HttpServer, Shutdown};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";
pub const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video";
pub const MP3_BYTES: &[u8] = b"ID3fake-audio";

type Params = Query<HashMap<String, String>>;

/// Mock upstream state: its own base URL and a counter of flaky calls.
#[derive(Clone)]
pub struct Upstream {
    pub base: String,
    pub flaky_calls: Arc<AtomicUsize>,
}

pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub async fn start_upstream() -> (SocketAddr, Upstream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let upstream = Upstream {
        base: format!("http://{}", addr),
        flaky_calls: Arc::new(AtomicUsize::new(0)),
    };

    let router = Router::new()
        // Unsplash
        .route("/search/photos", get(unsplash_search))
        // Pexels
        .route("/v1/search", get(pexels_search))
        // Pixabay
        .route("/api/", get(pixabay))
        // OpenVerse
        .route("/v1/images/", get(openverse_search))
        .route("/v1/images/{id}", get(openverse_image))
        // IconFinder
        .route("/v4/icons/search", get(iconfinder_search))
        .route("/v4/icons/{id}", get(iconfinder_icon))
        .route("/v4/icons/{id}/download", get(iconfinder_download))
        // Freepik
        .route("/v1/resources", get(freepik_search))
        // TMDB
        .route("/3/movie/popular", get(tmdb_list))
        .route("/3/movie/top_rated", get(tmdb_list))
        .route("/3/trending/movie/week", get(tmdb_list))
        .route("/3/search/movie", get(tmdb_list))
        .route("/3/discover/movie", get(tmdb_list))
        // RapidAPI
        .route("/v2/video/details", get(youtube_details))
        .route("/api/instagram/links", post(instagram_links))
        .route("/", post(tiktok_video))
        .route("/download", post(vidu_download))
        // Media bodies
        .route("/media/{file}", get(media))
        .with_state(upstream.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, upstream)
}

/// A config with every provider pointed at `upstream` and every key set.
pub fn test_config(upstream: SocketAddr) -> HubConfig {
    let base = format!("http://{}", upstream);
    let mut config = HubConfig::default();

    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.metrics_enabled = false;
    config.rate_limit.enabled = false;
    config.retries.base_delay_ms = 1;
    config.retries.max_delay_ms = 5;
    config.security.allowed_image_hosts = vec!["127.0.0.1".to_string()];
    config.security.allow_private_media_hosts = true;

    let providers = &mut config.providers;
    for endpoint in [
        &mut providers.unsplash,
        &mut providers.pexels,
        &mut providers.pixabay,
        &mut providers.openverse,
        &mut providers.iconfinder,
        &mut providers.freepik,
        &mut providers.tmdb,
    ] {
        endpoint.base_url = base.clone();
        endpoint.api_key = Some("test-key".to_string());
    }

    let service = RapidApiService {
        base_url: base,
        host: "test.rapidapi.example".to_string(),
    };
    config.rapidapi.api_key = Some("rapid-key".to_string());
    config.rapidapi.youtube = service.clone();
    config.rapidapi.instagram = service.clone();
    config.rapidapi.tiktok = service.clone();
    config.rapidapi.vidu = Some(service);

    config
}

/// A running hub.
pub struct Hub {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<HubConfig>,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl Hub {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_hub(config: HubConfig) -> Hub {
    let server = HttpServer::new(config).unwrap();
    let state = server.state();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let stop = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, config_updates, stop).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    Hub {
        addr,
        shutdown,
        updates,
        state,
        client,
    }
}

/// A hub in front of a fresh mock upstream.
pub async fn start_default() -> (Hub, Upstream) {
    let (addr, upstream) = start_upstream().await;
    (start_hub(test_config(addr)).await, upstream)
}

fn bad_key() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" }))).into_response()
}

fn has_rapidapi_headers(headers: &HeaderMap) -> bool {
    headers.get("x-rapidapi-key").is_some_and(|v| v == "rapid-key")
        && headers.get("x-rapidapi-host").is_some_and(|v| v == "test.rapidapi.example")
}

async fn unsplash_search(headers: HeaderMap, Query(q): Params) -> Response {
    if q.get("client_id").map(String::as_str) != Some("test-key")
        || headers.get("accept-version").is_none_or(|v| v != "v1")
    {
        return bad_key();
    }
    if q.get("query").map(String::as_str) == Some("explode") {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "total": 42,
        "total_pages": 3,
        "results": [{
            "id": "u1",
            "urls": { "regular": "https://images.unsplash.com/r", "thumb": "https://images.unsplash.com/t", "full": "https://images.unsplash.com/f" },
            "links": { "download": "https://unsplash.com/photos/u1/download", "download_location": "https://api.unsplash.com/photos/u1/download" },
            "description": null,
            "alt_description": format!("a photo of {}", q.get("query").cloned().unwrap_or_default()),
            "user": { "name": "Ansel", "links": { "html": "https://unsplash.com/@ansel" } },
            "width": 4000,
            "height": 3000
        }]
    }))
    .into_response()
}

async fn pexels_search(headers: HeaderMap) -> Response {
    if headers.get(header::AUTHORIZATION).is_none_or(|v| v != "test-key") {
        return bad_key();
    }
    Json(json!({
        "total_results": 45,
        "photos": [{
            "id": 101,
            "src": { "large": "https://images.pexels.com/l", "medium": "https://images.pexels.com/m", "original": "https://images.pexels.com/o" },
            "alt": "",
            "photographer": "Dora",
            "photographer_url": "https://pexels.com/@dora",
            "width": 800,
            "height": 600
        }]
    }))
    .into_response()
}

async fn pixabay(Query(q): Params) -> Response {
    if q.get("key").map(String::as_str) != Some("test-key") {
        return bad_key();
    }
    if let Some(id) = q.get("id") {
        if id == "404" {
            return Json(json!({ "hits": [] })).into_response();
        }
        return Json(json!({
            "hits": [{
                "id": id.parse::<u64>().unwrap_or(0),
                "type": "vector/svg",
                "previewURL": "https://cdn.pixabay.com/p.png",
                "largeImageURL": "https://cdn.pixabay.com/l.png",
                "imageURL": "https://cdn.pixabay.com/full.png",
                "pageURL": "https://pixabay.com/a",
                "user": "pix",
                "downloads": 10,
                "tags": "tree, leaf",
                "imageWidth": 640,
                "imageHeight": 480
            }]
        }))
        .into_response();
    }

    let image_type = q.get("image_type").cloned().unwrap_or_default();
    let (id, downloads) = match image_type.as_str() {
        "vector" => (1, 500),
        "illustration" => (2, 100),
        _ => (3, 300),
    };
    Json(json!({
        "hits": [{
            "id": id,
            "previewURL": "https://cdn.pixabay.com/p.png",
            "largeImageURL": "https://cdn.pixabay.com/l.png",
            "pageURL": "https://pixabay.com/a",
            "user": "pix",
            "downloads": downloads,
            "tags": "tree, leaf"
        }]
    }))
    .into_response()
}

async fn openverse_search() -> Json<Value> {
    Json(json!({
        "results": [{
            "id": "ov-1",
            "title": "Open photo",
            "thumbnail": "https://api.openverse.org/t",
            "url": "https://live.staticflickr.com/ov1.jpg",
            "creator": "someone",
            "tags": [{ "name": "sky" }]
        }]
    }))
}

async fn openverse_image(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "id": id,
        "title": "Open photo",
        "thumbnail": "https://api.openverse.org/t",
        "url": "https://live.staticflickr.com/ov1.jpg",
        "creator": "someone",
        "license": "by"
    }))
    .into_response()
}

async fn iconfinder_search(headers: HeaderMap) -> Response {
    if headers.get(header::AUTHORIZATION).is_none_or(|v| v != "Bearer test-key") {
        return bad_key();
    }
    Json(json!({
        "icons": [{
            "icon_id": 77,
            "tags": ["star"],
            "raster_sizes": [{ "formats": [{ "preview_url": "https://cdn.iconfinder.com/r.png" }] }],
            "vector_sizes": [{ "formats": [{ "preview_url": "https://cdn.iconfinder.com/v.svg" }] }],
            "is_premium": false
        }]
    }))
    .into_response()
}

async fn iconfinder_icon(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "icon_id": id.parse::<u64>().unwrap_or(0), "tags": ["star"] }))
}

async fn iconfinder_download(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "formats": [
            { "format": "png", "download_url": format!("https://cdn.iconfinder.com/{}.png", id) },
            { "format": "svg", "download_url": format!("https://cdn.iconfinder.com/{}.svg", id) }
        ]
    }))
}

async fn freepik_search(headers: HeaderMap) -> Response {
    if headers.get("x-freepik-api-key").is_none_or(|v| v != "test-key") {
        return bad_key();
    }
    Json(json!({
        "data": [{
            "id": 9,
            "title": "Flat icon set",
            "image": { "source": { "url": "https://img.freepik.com/9.jpg" } },
            "download_count": 400,
            "tags": ["flat", { "name": "icons" }]
        }]
    }))
    .into_response()
}

async fn tmdb_list(Query(q): Params) -> Response {
    if q.get("api_key").map(String::as_str) != Some("test-key") {
        return bad_key();
    }
    let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "page": page,
        "total_pages": 7,
        "total_results": 140,
        "results": [{
            "id": 603,
            "title": "The Matrix",
            "overview": q.get("with_genres").map(|g| format!("genre {}", g)).unwrap_or_default(),
            "poster_path": "/p.jpg",
            "vote_average": 8.2,
            "vote_count": 1000,
            "popularity": 90.5,
            "genre_ids": [28, 878],
            "video": false,
            "media_type": "movie"
        }]
    }))
    .into_response()
}

async fn youtube_details(State(up): State<Upstream>, headers: HeaderMap, Query(q): Params) -> Response {
    if !has_rapidapi_headers(&headers) {
        return bad_key();
    }
    match q.get("videoId").map(String::as_str) {
        Some("private") => return StatusCode::FORBIDDEN.into_response(),
        Some("broken") => return Json(json!({ "errorId": "VideoNotFound" })).into_response(),
        _ => {}
    }
    Json(json!({
        "errorId": "Success",
        "id": q.get("videoId"),
        "title": "Never Gonna: Give You Up!",
        "lengthSeconds": "213",
        "thumbnails": [{ "url": "https://i.ytimg.com/small.jpg" }, { "url": "https://i.ytimg.com/big.jpg" }],
        "videos": { "items": [
            { "url": format!("{}/media/clip.mp4", up.base), "qualityLabel": "720p", "extension": "mp4", "itag": 22 }
        ] },
        "audios": { "items": [
            { "url": format!("{}/media/song.mp3", up.base), "extension": "mp3", "itag": 140 }
        ] }
    }))
    .into_response()
}

async fn instagram_links(State(up): State<Upstream>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !has_rapidapi_headers(&headers) {
        return bad_key();
    }
    let url = body["url"].as_str().unwrap_or_default();
    if url.contains("/p/private") {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!([{
        "urls": [{ "url": format!("{}/media/clip.mp4", up.base), "extension": "mp4" }],
        "meta": { "username": "nasa", "title": "Launch day" },
        "pictureUrl": format!("{}/media/pic.jpg", up.base)
    }]))
    .into_response()
}

async fn tiktok_video(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !has_rapidapi_headers(&headers) {
        return bad_key();
    }
    let url = form.get("url").cloned().unwrap_or_default();
    if url.contains("nodata") {
        return Json(json!({ "code": -1, "msg": "not found" })).into_response();
    }
    Json(json!({
        "data": {
            "title": "dance",
            "play": format!("{}/media/clip.mp4", up.base),
            "hdplay": format!("{}/media/hd.mp4", up.base),
            "wmplay": format!("{}/media/wm.mp4", up.base),
            "music": format!("{}/media/song.mp3", up.base),
            "cover": "https://p16.tiktokcdn.com/c.jpg",
            "duration": 15,
            "play_count": 1000,
            "digg_count": 50,
            "comment_count": 5,
            "share_count": 2,
            "author": { "nickname": "Dancer", "unique_id": "dancer" }
        }
    }))
    .into_response()
}

async fn vidu_download(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !has_rapidapi_headers(&headers) {
        return bad_key();
    }
    if body["url"].as_str() == Some("https://vidu.example/fail") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Unsupported link" }))).into_response();
    }
    if body["url"].as_str() == Some("https://vidu.example/garbled") {
        return (StatusCode::BAD_GATEWAY, "upstream exploded").into_response();
    }
    Json(json!({ "status": "ok", "links": [{ "quality": "1080p", "url": "https://cdn.vidu.example/m.mp4" }], "echo": body["url"] }))
        .into_response()
}

async fn media(State(up): State<Upstream>, Path(file): Path<String>) -> Response {
    match file.as_str() {
        "photo.png" => ([(header::CONTENT_TYPE, "image/png; charset=binary")], PNG_BYTES).into_response(),
        "photo" => PNG_BYTES.into_response(),
        "clip.mp4" | "hd.mp4" | "wm.mp4" => ([(header::CONTENT_TYPE, "video/mp4")], MP4_BYTES).into_response(),
        "song.mp3" => ([(header::CONTENT_TYPE, "audio/mpeg")], MP3_BYTES).into_response(),
        "pic.jpg" => ([(header::CONTENT_TYPE, "image/jpeg")], PNG_BYTES).into_response(),
        "flaky.png" => {
            if up.flaky_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                StatusCode::SERVICE_UNAVAILABLE.into_response()
            } else {
                ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES).into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
