//! Unsplash photo search.

use serde::Deserialize;

use crate::catalog::{Image, ImagePage, ImageSource, RawId};
use crate::config::ProviderEndpoint;
use crate::providers::{endpoint, first_text, ProviderError, ProviderResult, SearchQuery, UpstreamClient};

pub const NAME: &str = "Unsplash";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    total_pages: u64,
}

#[derive(Debug, Deserialize)]
struct Photo {
    id: String,
    urls: Urls,
    links: Links,
    description: Option<String>,
    alt_description: Option<String>,
    user: User,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

#[derive(Debug, Deserialize)]
struct Urls {
    #[serde(default)]
    regular: String,
    #[serde(default)]
    thumb: String,
    #[serde(default)]
    full: String,
}

#[derive(Debug, Deserialize)]
struct Links {
    #[serde(default)]
    download: String,
    download_location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(default)]
    name: String,
    links: Option<UserLinks>,
}

#[derive(Debug, Deserialize)]
struct UserLinks {
    #[serde(default)]
    html: String,
}

impl From<Photo> for Image {
    fn from(photo: Photo) -> Self {
        let description = first_text([photo.description.as_deref(), photo.alt_description.as_deref()])
            .unwrap_or_else(|| "Untitled".to_string());
        Image {
            id: RawId::Text(photo.id),
            source: ImageSource::Unsplash,
            url: photo.urls.regular,
            thumb: photo.urls.thumb,
            full: photo.urls.full,
            download: photo.links.download,
            download_location: photo.links.download_location,
            description,
            photographer: photo.user.name,
            photographer_url: photo.user.links.map(|l| l.html).unwrap_or_default(),
            width: photo.width,
            height: photo.height,
        }
    }
}

/// Client for the Unsplash search API.
#[derive(Clone)]
pub struct Unsplash {
    client: UpstreamClient,
    base_url: String,
    key: Option<String>,
}

impl Unsplash {
    pub fn new(client: UpstreamClient, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: endpoint.base_url.clone(),
            key: endpoint.key().map(str::to_string),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    pub async fn search(&self, query: &SearchQuery) -> ProviderResult<ImagePage> {
        let key = self.key.as_deref().ok_or(ProviderError::NotConfigured { provider: NAME })?;
        let url = endpoint(NAME, &self.base_url, &["search", "photos"])?;

        let request = self
            .client
            .http()
            .get(url)
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query.query.clone()),
                ("page", query.page.to_string()),
                ("per_page", query.per_page.to_string()),
                ("client_id", key.to_string()),
            ]);

        let data: SearchResponse = self.client.get_json(NAME, request).await?;
        Ok(ImagePage {
            images: data.results.into_iter().map(Image::from).collect(),
            total: data.total,
            total_pages: data.total_pages,
            current_page: query.page,
        })
    }
}
