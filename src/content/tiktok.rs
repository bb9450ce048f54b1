//! TikTok videos without watermark.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::content::RapidApiEndpoint;
use crate::providers::{first_text, ProviderResult, UpstreamClient};

pub const NAME: &str = "TikTok";

pub fn is_tiktok_url(url: &str) -> bool {
    url.contains("tiktok.com")
}

#[derive(Debug, Clone, Deserialize)]
pub struct TikTokResponse {
    pub data: Option<VideoData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoData {
    title: Option<String>,
    play: Option<String>,
    hdplay: Option<String>,
    wmplay: Option<String>,
    music: Option<String>,
    cover: Option<String>,
    origin_cover: Option<String>,
    duration: Option<u64>,
    play_count: Option<u64>,
    digg_count: Option<u64>,
    comment_count: Option<u64>,
    share_count: Option<u64>,
    author: Option<Author>,
    music_info: Option<MusicInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct Author {
    nickname: Option<String>,
    unique_id: Option<String>,
    avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MusicInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    pub id: u8,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub quality: &'static str,
    pub thumbnail: Option<String>,
}

/// Video info returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub success: bool,
    pub title: String,
    pub author: String,
    pub author_avatar: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: u64,
    pub play_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub media_items: Option<Vec<MediaItem>>,
    pub music_info: Option<MusicInfo>,
}

impl VideoData {
    fn cover(&self) -> Option<String> {
        first_text([self.cover.as_deref(), self.origin_cover.as_deref()])
    }

    pub fn media_items(&self) -> Vec<MediaItem> {
        let cover = self.cover();
        let variants = [
            (0, &self.play, "video", "No Watermark"),
            (1, &self.hdplay, "video", "HD No Watermark"),
            (2, &self.wmplay, "video", "With Watermark"),
        ];

        let mut items: Vec<MediaItem> = variants
            .into_iter()
            .filter_map(|(id, url, kind, quality)| {
                let url = url.as_deref().filter(|u| !u.is_empty())?;
                Some(MediaItem {
                    id,
                    url: url.to_string(),
                    kind,
                    quality,
                    thumbnail: cover.clone(),
                })
            })
            .collect();

        if let Some(music) = self.music.as_deref().filter(|u| !u.is_empty()) {
            items.push(MediaItem {
                id: 3,
                url: music.to_string(),
                kind: "audio",
                quality: "Audio Only",
                thumbnail: self.music_info.as_ref().and_then(|m| m.cover.clone()),
            });
        }
        items
    }

    pub fn info(&self) -> VideoInfo {
        let media = self.media_items();
        let author = self.author.as_ref();
        VideoInfo {
            success: true,
            title: first_text([self.title.as_deref()]).unwrap_or_else(|| "TikTok Video".to_string()),
            author: first_text([
                author.and_then(|a| a.nickname.as_deref()),
                author.and_then(|a| a.unique_id.as_deref()),
            ])
            .unwrap_or_else(|| "Unknown".to_string()),
            author_avatar: author.and_then(|a| a.avatar.clone()),
            thumbnail: self.cover(),
            duration: self.duration.unwrap_or(0),
            play_count: self.play_count.unwrap_or(0),
            like_count: self.digg_count.unwrap_or(0),
            comment_count: self.comment_count.unwrap_or(0),
            share_count: self.share_count.unwrap_or(0),
            media_items: if media.is_empty() { None } else { Some(media) },
            music_info: self.music_info.clone(),
        }
    }

    /// Preferred download: HD without watermark, then SD, then watermarked.
    pub fn best_video_url(&self) -> Option<String> {
        first_text([self.hdplay.as_deref(), self.play.as_deref(), self.wmplay.as_deref()])
    }
}

/// Client for the RapidAPI TikTok downloader.
#[derive(Clone)]
pub struct TikTok {
    client: UpstreamClient,
    endpoint: RapidApiEndpoint,
}

impl TikTok {
    pub fn new(client: UpstreamClient, endpoint: RapidApiEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_configured()
    }

    pub async fn video(&self, url: &str) -> ProviderResult<TikTokResponse> {
        let request = self
            .endpoint
            .request(&self.client, NAME, Method::POST, &[""])?
            .form(&[("url", url)]);
        self.client.get_json(NAME, request).await
    }
}
