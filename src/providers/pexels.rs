//! Pexels photo search.

use serde::Deserialize;

use crate::catalog::{Image, ImagePage, ImageSource, RawId};
use crate::config::ProviderEndpoint;
use crate::providers::{endpoint, first_text, ProviderError, ProviderResult, SearchQuery, UpstreamClient};

pub const NAME: &str = "Pexels";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct Photo {
    id: u64,
    src: Src,
    alt: Option<String>,
    #[serde(default)]
    photographer: String,
    #[serde(default)]
    photographer_url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

#[derive(Debug, Deserialize)]
struct Src {
    #[serde(default)]
    large: String,
    #[serde(default)]
    medium: String,
    #[serde(default)]
    original: String,
}

impl From<Photo> for Image {
    fn from(photo: Photo) -> Self {
        Image {
            id: RawId::Num(photo.id),
            source: ImageSource::Pexels,
            url: photo.src.large,
            thumb: photo.src.medium,
            full: photo.src.original.clone(),
            download: photo.src.original,
            download_location: None,
            description: first_text([photo.alt.as_deref()]).unwrap_or_else(|| "Untitled".to_string()),
            photographer: photo.photographer,
            photographer_url: photo.photographer_url,
            width: photo.width,
            height: photo.height,
        }
    }
}

/// Client for the Pexels search API.
#[derive(Clone)]
pub struct Pexels {
    client: UpstreamClient,
    base_url: String,
    key: Option<String>,
}

impl Pexels {
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
        let url = endpoint(NAME, &self.base_url, &["v1", "search"])?;

        let request = self
            .client
            .http()
            .get(url)
            .header(reqwest::header::AUTHORIZATION, key)
            .query(&[
                ("query", query.query.clone()),
                ("page", query.page.to_string()),
                ("per_page", query.per_page.to_string()),
            ]);

        let data: SearchResponse = self.client.get_json(NAME, request).await?;
        Ok(ImagePage {
            images: data.photos.into_iter().map(Image::from).collect(),
            total: data.total_results,
            total_pages: data.total_results.div_ceil(u64::from(query.per_page)),
            current_page: query.page,
        })
    }
}
