//! YouTube video details and stream selection.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::content::RapidApiEndpoint;
use crate::providers::{ProviderResult, RawId, UpstreamClient};

pub const NAME: &str = "YouTube";

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/shorts/)([a-zA-Z0-9_-]+)")
        .expect("video id pattern is a valid regex")
});

static UNSAFE_TITLE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s-]").expect("title filter is a valid regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

/// Whether `url` looks like it points at YouTube at all.
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube") || url.contains("youtu.be")
}

pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// One downloadable format offered to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Format {
    pub quality: String,
    pub format: String,
    pub itag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Format {
    fn fixed(quality: &str, format: &str, itag: &str) -> Self {
        Self {
            quality: quality.to_string(),
            format: format.to_string(),
            itag: itag.to_string(),
            url: None,
        }
    }
}

/// Video info returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub success: bool,
    pub video_id: String,
    pub title: String,
    pub duration: u64,
    pub thumbnail: Option<String>,
    pub formats: Vec<Format>,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoData {
    pub success: bool,
    pub video_id: String,
    pub title: String,
    pub duration: u64,
    pub formats: Vec<Format>,
}

/// Placeholder answer when no RapidAPI key is configured.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoInfo {
    pub error: String,
    pub is_demo: bool,
    pub demo_data: DemoData,
}

pub fn demo_info() -> DemoInfo {
    DemoInfo {
        error: "YouTube download service not configured. Please set RAPIDAPI_KEY".to_string(),
        is_demo: true,
        demo_data: DemoData {
            success: true,
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "YouTube Video Title".to_string(),
            duration: 213,
            formats: vec![
                Format::fixed("4K (2160p)", "mp4", "313"),
                Format::fixed("1440p (2K)", "mp4", "271"),
                Format::fixed("1080p (Full HD)", "mp4", "18"),
                Format::fixed("720p (HD)", "mp4", "22"),
                Format::fixed("480p (SD)", "mp4", "135"),
            ],
        },
    }
}

/// Raw `/v2/video/details` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    error_id: Option<String>,
    id: Option<String>,
    title: Option<String>,
    length_seconds: Option<RawId>,
    #[serde(default)]
    thumbnails: Vec<Thumbnail>,
    videos: Option<StreamList>,
    audios: Option<StreamList>,
}

#[derive(Debug, Clone, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StreamList {
    #[serde(default)]
    items: Vec<Stream>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stream {
    url: Option<String>,
    quality: Option<String>,
    quality_label: Option<String>,
    extension: Option<String>,
    itag: Option<RawId>,
    id: Option<RawId>,
}

impl Stream {
    fn has_itag(&self, itag: &str) -> bool {
        self.itag.as_ref().is_some_and(|i| i.to_string() == itag)
    }

    fn extension_or(&self, default: &str) -> String {
        self.extension.clone().unwrap_or_else(|| default.to_string())
    }
}

/// The media URL a download streams from, plus its file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedStream {
    pub url: String,
    pub extension: String,
}

impl VideoDetails {
    /// The service reports success in-band.
    pub fn is_success(&self) -> bool {
        self.error_id.as_deref() == Some("Success")
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn videos(&self) -> &[Stream] {
        self.videos.as_ref().map(|l| l.items.as_slice()).unwrap_or_default()
    }

    fn audios(&self) -> &[Stream] {
        self.audios.as_ref().map(|l| l.items.as_slice()).unwrap_or_default()
    }

    pub fn formats(&self) -> Vec<Format> {
        let mut formats: Vec<Format> = self
            .videos()
            .iter()
            .filter_map(|video| {
                let quality = video.quality_label.clone().or_else(|| video.quality.clone())?;
                Some(Format {
                    quality,
                    format: video.extension_or("mp4"),
                    itag: video
                        .itag
                        .as_ref()
                        .or(video.id.as_ref())
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                    url: video.url.clone(),
                })
            })
            .collect();

        if let Some(audio) = self.audios().first() {
            formats.push(Format {
                quality: "Audio Only".to_string(),
                format: audio.extension_or("mp3"),
                itag: audio
                    .itag
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "251".to_string()),
                url: audio.url.clone(),
            });
        }

        if formats.is_empty() {
            formats.push(Format::fixed("720p", "mp4", "22"));
            formats.push(Format::fixed("Audio Only", "mp3", "251"));
        }
        formats
    }

    pub fn info(&self, video_id: &str, download_url: String) -> VideoInfo {
        VideoInfo {
            success: true,
            video_id: self.id.clone().unwrap_or_else(|| video_id.to_string()),
            title: self.title.clone().unwrap_or_default(),
            duration: self.length_seconds.as_ref().and_then(RawId::as_u64).unwrap_or(0),
            thumbnail: self.thumbnails.last().and_then(|t| t.url.clone()),
            formats: self.formats(),
            download_url,
        }
    }

    /// Pick the stream for `itag`: videos first, then audios. Itag 251 means
    /// "any audio". Otherwise fall back to the first video.
    pub fn select_stream(&self, itag: Option<&str>) -> Option<SelectedStream> {
        let pick = |stream: &Stream, default_ext: &str| {
            stream.url.clone().map(|url| SelectedStream {
                url,
                extension: stream.extension_or(default_ext),
            })
        };

        if let Some(itag) = itag {
            if let Some(found) = self.videos().iter().find(|v| v.has_itag(itag)).and_then(|v| pick(v, "mp4")) {
                return Some(found);
            }
            if let Some(found) = self.audios().iter().find(|a| a.has_itag(itag)).and_then(|a| pick(a, "mp3")) {
                return Some(found);
            }
            if itag == "251" {
                if let Some(found) = self.audios().first().and_then(|a| pick(a, "mp3")) {
                    return Some(found);
                }
            }
        }

        self.videos().first().and_then(|v| pick(v, "mp4"))
    }

    /// Filesystem-safe name derived from the title.
    pub fn file_stem(&self) -> String {
        let title = self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("youtube_video");
        sanitize_title(title)
    }
}

/// Strip everything but letters, digits, spaces and hyphens; join words with `_`.
pub fn sanitize_title(title: &str) -> String {
    let kept = UNSAFE_TITLE_CHARS.replace_all(title, "");
    WHITESPACE.replace_all(&kept, "_").chars().take(100).collect()
}

/// Client for the RapidAPI YouTube media downloader.
#[derive(Clone)]
pub struct YouTube {
    client: UpstreamClient,
    endpoint: RapidApiEndpoint,
}

impl YouTube {
    pub fn new(client: UpstreamClient, endpoint: RapidApiEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_configured()
    }

    pub async fn details(&self, video_id: &str) -> ProviderResult<VideoDetails> {
        let request = self
            .endpoint
            .request(&self.client, NAME, Method::GET, &["v2", "video", "details"])?
            .query(&[("videoId", video_id)]);
        self.client.get_json(NAME, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> VideoDetails {
        serde_json::from_value(serde_json::json!({
            "errorId": "Success",
            "id": "abc123",
            "title": "My Great Video! (Official)",
            "lengthSeconds": "245",
            "thumbnails": [{"url": "small.jpg"}, {"url": "large.jpg"}],
            "videos": {"items": [
                {"url": "v720", "quality": "hd720", "qualityLabel": "720p", "extension": "mp4", "itag": 22},
                {"url": "v360", "quality": "medium", "extension": "webm", "itag": "18"},
                {"url": "vnolabel", "itag": 999}
            ]},
            "audios": {"items": [
                {"url": "a140", "extension": "m4a", "itag": 140}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn extracts_ids_from_every_url_form() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1"), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("https://youtube.com/shorts/a_b-c"), Some("a_b-c"));
        assert_eq!(extract_video_id("https://youtube.com/channel/xyz"), None);
    }

    #[test]
    fn formats_list_videos_then_first_audio() {
        let formats = details().formats();
        assert_eq!(formats.len(), 3);
        assert_eq!(formats[0].quality, "720p");
        assert_eq!(formats[0].itag, "22");
        assert_eq!(formats[1].quality, "medium");
        assert_eq!(formats[1].format, "webm");
        assert_eq!(formats[2].quality, "Audio Only");
        assert_eq!(formats[2].format, "m4a");
        assert_eq!(formats[2].itag, "140");
    }

    #[test]
    fn fallback_formats_when_none_listed() {
        let details: VideoDetails =
            serde_json::from_value(serde_json::json!({"errorId": "Success", "title": "t"})).unwrap();
        let formats = details.formats();
        assert_eq!(formats, vec![Format::fixed("720p", "mp4", "22"), Format::fixed("Audio Only", "mp3", "251")]);
    }

    #[test]
    fn info_uses_last_thumbnail_and_numeric_duration() {
        let info = details().info("fallback", "/dl".into());
        assert_eq!(info.video_id, "abc123");
        assert_eq!(info.duration, 245);
        assert_eq!(info.thumbnail.as_deref(), Some("large.jpg"));
    }

    #[test]
    fn stream_selection_order() {
        let d = details();
        assert_eq!(d.select_stream(Some("18")).unwrap().url, "v360");
        assert_eq!(d.select_stream(Some("140")).unwrap().extension, "m4a");
        assert_eq!(d.select_stream(Some("251")).unwrap().url, "a140");
        assert_eq!(d.select_stream(Some("12345")).unwrap().url, "v720");
        assert_eq!(d.select_stream(None).unwrap().url, "v720");
    }

    #[test]
    fn title_sanitizing() {
        assert_eq!(details().file_stem(), "My_Great_Video_Official");
        assert_eq!(sanitize_title(&"a".repeat(150)).len(), 100);
        let untitled: VideoDetails = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(untitled.file_stem(), "youtube_video");
    }

    #[test]
    fn demo_payload_shape() {
        let json = serde_json::to_value(demo_info()).unwrap();
        assert_eq!(json["isDemo"], true);
        assert_eq!(json["demoData"]["videoId"], "dQw4w9WgXcQ");
        assert_eq!(json["demoData"]["formats"][0]["itag"], "313");
        assert!(json["demoData"]["formats"][0].get("url").is_none());
    }
}
