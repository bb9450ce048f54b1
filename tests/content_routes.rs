//! YouTube, Instagram and TikTok info and download routes.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

const VIDEO: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

#[tokio::test]
async fn youtube_info_lists_formats() {
    let (hub, upstream) = common::start_default().await;

    let res = hub
        .client
        .post(hub.url("/api/content/youtube"))
        .json(&json!({ "url": VIDEO }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["videoId"], "dQw4w9WgXcQ");
    assert_eq!(body["title"], "Never Gonna: Give You Up!");
    assert_eq!(body["duration"], 213);
    assert_eq!(body["thumbnail"], "https://i.ytimg.com/big.jpg");
    assert_eq!(
        body["downloadUrl"],
        "/api/content/youtube?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ"
    );

    let formats = body["formats"].as_array().unwrap();
    assert_eq!(formats.len(), 2);
    assert_eq!(formats[0]["quality"], "720p");
    assert_eq!(formats[0]["itag"], "22");
    assert_eq!(formats[0]["url"], format!("{}/media/clip.mp4", upstream.base));
    assert_eq!(formats[1]["quality"], "Audio Only");
    assert_eq!(formats[1]["format"], "mp3");
    assert_eq!(formats[1]["itag"], "140");
}

#[tokio::test]
async fn youtube_info_rejections() {
    let (hub, _upstream) = common::start_default().await;

    let cases = [
        ("https://vimeo.com/1", "Invalid YouTube URL"),
        ("https://www.youtube.com/feed", "Could not extract video ID from URL"),
        (
            "https://www.youtube.com/watch?v=private",
            "Could not access this video. It may be private, age-restricted, or unavailable.",
        ),
        ("https://youtu.be/broken", "Could not fetch video information"),
    ];
    for (url, message) in cases {
        let res = hub
            .client
            .post(hub.url("/api/content/youtube"))
            .json(&json!({ "url": url }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", url);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], message, "{}", url);
    }
}

#[tokio::test]
async fn youtube_without_key_answers_demo_data() {
    let (addr, _upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.rapidapi.api_key = None;
    let hub = common::start_hub(config).await;

    let res = hub
        .client
        .post(hub.url("/api/content/youtube"))
        .json(&json!({ "url": VIDEO }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["isDemo"], true);
    assert_eq!(body["demoData"]["videoId"], "dQw4w9WgXcQ");
    assert_eq!(body["demoData"]["formats"].as_array().unwrap().len(), 5);

    let res = hub
        .client
        .get(hub.url("/api/content/youtube"))
        .query(&[("url", VIDEO)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "YouTube download service not configured");
}

#[tokio::test]
async fn youtube_download_checks_the_link_before_the_key() {
    let (addr, _upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.rapidapi.api_key = None;
    let hub = common::start_hub(config).await;

    let res = hub
        .client
        .get(hub.url("/api/content/youtube"))
        .query(&[("url", "https://vimeo.com/1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid YouTube URL");
}

#[tokio::test]
async fn youtube_download_streams_selected_format() {
    let (hub, _upstream) = common::start_default().await;

    let res = hub
        .client
        .get(hub.url("/api/content/youtube"))
        .query(&[("url", VIDEO), ("itag", "140")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "audio/mpeg");
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=\"Never_Gonna_Give_You_Up.mp3\""
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), common::MP3_BYTES);

    let res = hub
        .client
        .get(hub.url("/api/content/youtube"))
        .query(&[("url", VIDEO)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "video/mp4");
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=\"Never_Gonna_Give_You_Up.mp4\""
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), common::MP4_BYTES);
}

#[tokio::test]
async fn get_without_parameters_describes_the_endpoint() {
    let (hub, _upstream) = common::start_default().await;

    for (platform, message) in [
        ("youtube", "YouTube download API endpoint"),
        ("instagram", "Instagram download API endpoint"),
        ("tiktok", "TikTok download API endpoint"),
    ] {
        let res = hub
            .client
            .get(hub.url(&format!("/api/content/{}", platform)))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], message);
        assert_eq!(body["methods"], json!(["POST", "GET"]));
    }
}

#[tokio::test]
async fn instagram_info_and_download() {
    let (hub, _upstream) = common::start_default().await;
    let post = "https://www.instagram.com/p/ABC123/";

    let res = hub
        .client
        .post(hub.url("/api/content/instagram"))
        .json(&json!({ "url": post }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["shortcode"], "ABC123");
    assert_eq!(body["author"], "nasa");
    assert_eq!(body["caption"], "Launch day");
    assert_eq!(body["mediaItems"][0]["type"], "video");

    let res = hub
        .client
        .get(hub.url("/api/content/instagram"))
        .query(&[("url", post)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "video/mp4");
    let disposition = res.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"instagram_"));
    assert!(disposition.ends_with(".mp4\""));
    assert_eq!(res.bytes().await.unwrap().as_ref(), common::MP4_BYTES);
}

#[tokio::test]
async fn instagram_rejections() {
    let (hub, _upstream) = common::start_default().await;

    let cases = [
        ("https://example.com/p/ABC", "Invalid Instagram URL"),
        (
            "https://www.instagram.com/nasa/",
            "Could not extract post ID from URL. Please use a direct post/reel URL.",
        ),
        (
            "https://www.instagram.com/p/private/",
            "Could not access this content. It may be private or unavailable.",
        ),
    ];
    for (url, message) in cases {
        let res = hub
            .client
            .post(hub.url("/api/content/instagram"))
            .json(&json!({ "url": url }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", url);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], message, "{}", url);
    }
}

#[tokio::test]
async fn media_url_downloads_are_guarded() {
    let (hub, upstream) = common::start_default().await;

    let res = hub
        .client
        .get(hub.url("/api/content/instagram"))
        .query(&[("mediaUrl", format!("{}/media/pic.jpg", upstream.base))])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/jpeg");
    assert!(res.headers()["content-disposition"].to_str().unwrap().ends_with(".jpg\""));

    let res = hub
        .client
        .get(hub.url("/api/content/instagram"))
        .query(&[("mediaUrl", format!("{}/media/gone.jpg", upstream.base))])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch media");

    let res = hub
        .client
        .get(hub.url("/api/content/tiktok"))
        .query(&[("mediaUrl", "file:///etc/passwd")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn private_media_hosts_are_refused_by_default() {
    let (addr, upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.security.allow_private_media_hosts = false;
    let hub = common::start_hub(config).await;

    let res = hub
        .client
        .get(hub.url("/api/content/tiktok"))
        .query(&[("mediaUrl", format!("{}/media/clip.mp4", upstream.base))])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Media URL points at a private address");
}

#[tokio::test]
async fn tiktok_info_lists_variants() {
    let (hub, _upstream) = common::start_default().await;

    let res = hub
        .client
        .post(hub.url("/api/content/tiktok"))
        .json(&json!({ "url": "https://www.tiktok.com/@dancer/video/1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "dance");
    assert_eq!(body["author"], "Dancer");
    assert_eq!(body["likeCount"], 50);

    let items = body["mediaItems"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[1]["quality"], "HD No Watermark");
    assert_eq!(items[3]["type"], "audio");

    let res = hub
        .client
        .post(hub.url("/api/content/tiktok"))
        .json(&json!({ "url": "https://www.tiktok.com/@dancer/video/nodata" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Could not fetch content information");
}

#[tokio::test]
async fn tiktok_download_prefers_hd() {
    let (hub, upstream) = common::start_default().await;

    let res = hub
        .client
        .get(hub.url("/api/content/tiktok"))
        .query(&[("url", "https://www.tiktok.com/@dancer/video/1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "video/mp4");
    assert_eq!(res.bytes().await.unwrap().as_ref(), common::MP4_BYTES);

    let res = hub
        .client
        .get(hub.url("/api/content/tiktok"))
        .query(&[("mediaUrl", format!("{}/media/song.mp3", upstream.base)), ("type", "audio".to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "audio/mpeg");
    let disposition = res.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"tiktok_"));
    assert!(disposition.ends_with(".mp3\""));
}
