//! Instagram post and reel media.
//!
//! The RapidAPI service answers in several shapes depending on the post:
//! a bare array of items, `{ value: [items] }`, `{ urls: [...] }` or a
//! single `{ url }`. [`LinksResponse`] accepts all of them.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::content::RapidApiEndpoint;
use crate::providers::{first_text, ProviderResult, UpstreamClient};

pub const NAME: &str = "Instagram";

static SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"instagram\.com/(?:p|reel|reels|tv)/([a-zA-Z0-9_-]+)")
        .expect("shortcode pattern is a valid regex")
});

pub fn is_instagram_url(url: &str) -> bool {
    url.contains("instagram.com")
}

pub fn extract_shortcode(url: &str) -> Option<&str> {
    SHORTCODE.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LinksResponse {
    Items(Vec<LinkItem>),
    Wrapped {
        value: Vec<LinkItem>,
    },
    Urls {
        urls: Vec<UrlEntry>,
        url: Option<String>,
        author: Option<String>,
        username: Option<String>,
        caption: Option<String>,
        title: Option<String>,
    },
    Single {
        url: String,
        #[serde(rename = "type")]
        kind: Option<String>,
        thumbnail: Option<String>,
        author: Option<String>,
        username: Option<String>,
        caption: Option<String>,
        title: Option<String>,
    },
    Unknown(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    #[serde(default)]
    urls: Vec<UrlEntry>,
    meta: Option<ItemMeta>,
    picture_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ItemMeta {
    username: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UrlEntry {
    Plain(String),
    Detailed {
        url: String,
        extension: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
        thumbnail: Option<String>,
    },
}

impl UrlEntry {
    fn url(&self) -> &str {
        match self {
            UrlEntry::Plain(url) | UrlEntry::Detailed { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    pub id: usize,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

/// Post info returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInfo {
    pub success: bool,
    pub shortcode: String,
    pub caption: String,
    pub author: String,
    pub thumbnail: Option<String>,
    pub media_items: Option<Vec<MediaItem>>,
    pub download_url: String,
}

fn media_kind(is_video: bool) -> String {
    let kind = if is_video { "video" } else { "image" };
    kind.to_string()
}

impl LinksResponse {
    fn items(&self) -> Option<&[LinkItem]> {
        match self {
            LinksResponse::Items(items) | LinksResponse::Wrapped { value: items } if !items.is_empty() => {
                Some(items.as_slice())
            }
            _ => None,
        }
    }

    pub fn info(&self, shortcode: &str, download_url: String) -> PostInfo {
        let mut author = "Unknown".to_string();
        let mut caption = "Instagram Content".to_string();
        let mut thumbnail = None;
        let mut media = Vec::new();

        if let Some(items) = self.items() {
            if let Some(first) = items.first() {
                if let Some(meta) = &first.meta {
                    author = first_text([meta.username.as_deref()]).unwrap_or(author);
                    caption = first_text([meta.title.as_deref()]).unwrap_or(caption);
                    thumbnail = first.picture_url.clone();
                }
            }
            for item in items {
                for entry in &item.urls {
                    let extension = match entry {
                        UrlEntry::Detailed { extension: Some(ext), .. } => ext.clone(),
                        _ => "jpg".to_string(),
                    };
                    let url = entry.url().to_string();
                    let is_video = extension == "mp4" || url.contains(".mp4");
                    media.push(MediaItem {
                        id: media.len(),
                        url,
                        kind: media_kind(is_video),
                        thumbnail: item.picture_url.clone(),
                        extension: Some(extension),
                    });
                }
            }
        } else {
            match self {
                LinksResponse::Urls { urls, author: a, username, caption: c, title, .. } => {
                    for (index, entry) in urls.iter().enumerate() {
                        let (kind, entry_thumbnail) = match entry {
                            UrlEntry::Detailed { kind, thumbnail, .. } => (kind.clone(), thumbnail.clone()),
                            UrlEntry::Plain(_) => (None, None),
                        };
                        media.push(MediaItem {
                            id: index,
                            url: entry.url().to_string(),
                            kind: kind.unwrap_or_else(|| media_kind(entry.url().contains(".mp4"))),
                            thumbnail: entry_thumbnail,
                            extension: None,
                        });
                    }
                    (author, caption) = author_and_caption([a, username], [c, title]);
                }
                LinksResponse::Single {
                    url,
                    kind,
                    thumbnail: single_thumbnail,
                    author: a,
                    username,
                    caption: c,
                    title,
                } => {
                    media.push(MediaItem {
                        id: 0,
                        url: url.clone(),
                        kind: kind.clone().unwrap_or_else(|| "video".to_string()),
                        thumbnail: single_thumbnail.clone(),
                        extension: None,
                    });
                    (author, caption) = author_and_caption([a, username], [c, title]);
                }
                _ => {}
            }
        }

        PostInfo {
            success: true,
            shortcode: shortcode.to_string(),
            caption,
            author,
            thumbnail,
            media_items: if media.is_empty() { None } else { Some(media) },
            download_url,
        }
    }

    /// The first media URL in the payload, whatever its shape.
    pub fn first_download_url(&self) -> Option<String> {
        match self {
            LinksResponse::Items(items) | LinksResponse::Wrapped { value: items } => items
                .first()
                .and_then(|item| item.urls.first())
                .map(|entry| entry.url().to_string()),
            LinksResponse::Urls { urls, url, .. } => urls
                .first()
                .map(|entry| entry.url().to_string())
                .or_else(|| url.clone()),
            LinksResponse::Single { url, .. } => Some(url.clone()),
            LinksResponse::Unknown(_) => None,
        }
    }
}

/// Author and caption from the top level of flat payloads.
fn author_and_caption(authors: [&Option<String>; 2], captions: [&Option<String>; 2]) -> (String, String) {
    (
        first_text(authors.map(Option::as_deref)).unwrap_or_else(|| "Unknown".to_string()),
        first_text(captions.map(Option::as_deref)).unwrap_or_else(|| "Instagram Content".to_string()),
    )
}

/// File extension for a downloaded Instagram body.
pub fn extension_for(content_type: &str) -> &'static str {
    if content_type.contains("video") {
        "mp4"
    } else {
        "jpg"
    }
}

/// Client for the RapidAPI Instagram downloader.
#[derive(Clone)]
pub struct Instagram {
    client: UpstreamClient,
    endpoint: RapidApiEndpoint,
}

impl Instagram {
    pub fn new(client: UpstreamClient, endpoint: RapidApiEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_configured()
    }

    pub async fn links(&self, url: &str) -> ProviderResult<LinksResponse> {
        let request = self
            .endpoint
            .request(&self.client, NAME, Method::POST, &["api", "instagram", "links"])?
            .json(&serde_json::json!({ "url": url }));
        self.client.get_json(NAME, request).await
    }
}
