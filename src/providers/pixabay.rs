//! Pixabay design assets.
//!
//! Pixabay filters by one `image_type` per call, so a search for several
//! asset kinds fans out into one request per kind.

use futures_util::future::join_all;
use serde::Deserialize;

use crate::catalog::{Asset, AssetSource, AssetType, RawId};
use crate::config::ProviderEndpoint;
use crate::providers::{endpoint, ProviderError, ProviderResult, SearchQuery, UpstreamClient};

pub const NAME: &str = "Pixabay";

/// Asset kinds Pixabay can be asked for.
pub const KINDS: &[AssetType] = &[AssetType::Vector, AssetType::Illustration, AssetType::Photo];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Hit {
    id: u64,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(rename = "previewURL", default)]
    preview_url: String,
    #[serde(rename = "largeImageURL", default)]
    large_image_url: String,
    #[serde(rename = "imageURL")]
    image_url: Option<String>,
    #[serde(rename = "pageURL", default)]
    page_url: String,
    #[serde(default)]
    user: String,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    tags: String,
    image_width: Option<u32>,
    image_height: Option<u32>,
}

impl Hit {
    fn tags(&self) -> Vec<String> {
        self.tags
            .split(", ")
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn into_search_asset(self, query: &str, image_type: &str) -> Asset {
        let tags = self.tags();
        Asset {
            id: AssetSource::Pixabay.asset_id(&self.id.to_string()),
            title: query.to_string(),
            description: format!("{image_type} asset"),
            kind: image_type.to_string(),
            thumbnail: self.preview_url,
            preview: self.large_image_url,
            full: None,
            author: self.user,
            downloads: self.downloads,
            tags,
            formats: vec!["jpg".into(), "png".into()],
            source: AssetSource::Pixabay,
            source_url: self.page_url,
            source_id: RawId::Num(self.id),
            license: None,
            category: None,
            width: None,
            height: None,
            is_premium: None,
            rating: None,
        }
    }

    fn into_detail_asset(self) -> Asset {
        let tags = self.tags();
        Asset {
            id: AssetSource::Pixabay.asset_id(&self.id.to_string()),
            title: "Design Asset".to_string(),
            description: "High-quality design asset from Pixabay".to_string(),
            kind: self.kind,
            thumbnail: self.preview_url,
            preview: self.large_image_url,
            full: self.image_url,
            author: self.user,
            downloads: self.downloads,
            tags,
            formats: vec!["jpg".into(), "png".into()],
            source: AssetSource::Pixabay,
            source_url: self.page_url,
            source_id: RawId::Num(self.id),
            license: Some("Pixabay License".to_string()),
            category: Some("Design".to_string()),
            width: self.image_width,
            height: self.image_height,
            is_premium: None,
            rating: None,
        }
    }
}

/// Pixabay `image_type` values queried for a requested asset type.
pub fn image_types(kind: AssetType) -> &'static [&'static str] {
    match kind {
        AssetType::All => &["vector", "illustration", "photo"],
        AssetType::Vector => &["vector"],
        AssetType::Illustration => &["illustration"],
        AssetType::Photo | AssetType::Template => &["photo"],
    }
}

/// Client for the Pixabay image API.
#[derive(Clone)]
pub struct Pixabay {
    client: UpstreamClient,
    base_url: String,
    key: Option<String>,
}

impl Pixabay {
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

    fn key(&self) -> ProviderResult<&str> {
        self.key.as_deref().ok_or(ProviderError::NotConfigured { provider: NAME })
    }

    /// Search every image type `kind` maps to. A failing type contributes
    /// nothing; the others still return.
    pub async fn search(&self, query: &SearchQuery, kind: AssetType) -> ProviderResult<Vec<Asset>> {
        let key = self.key()?;
        let url = endpoint(NAME, &self.base_url, &["api", ""])?;

        let calls = image_types(kind).iter().map(|image_type| {
            let request = self.client.http().get(url.clone()).query(&[
                ("key", key.to_string()),
                ("q", query.query.clone()),
                ("image_type", image_type.to_string()),
                ("page", query.page.to_string()),
                ("per_page", query.per_page.to_string()),
                ("order", "popular".to_string()),
            ]);
            async move {
                let result: ProviderResult<SearchResponse> = self.client.get_json(NAME, request).await;
                (*image_type, result)
            }
        });

        let mut assets = Vec::new();
        for (image_type, result) in join_all(calls).await {
            match result {
                Ok(data) => assets.extend(
                    data.hits
                        .into_iter()
                        .map(|hit| hit.into_search_asset(&query.query, image_type)),
                ),
                Err(e) => tracing::warn!(image_type, error = %e, "Pixabay search failed for image type"),
            }
        }
        Ok(assets)
    }

    async fn lookup(&self, id: &str) -> ProviderResult<Option<Hit>> {
        let key = self.key()?;
        let url = endpoint(NAME, &self.base_url, &["api", ""])?;
        let request = self
            .client
            .http()
            .get(url)
            .query(&[("key", key), ("id", AssetSource::Pixabay.strip_prefix(id))]);

        let data: SearchResponse = self.client.get_json(NAME, request).await?;
        Ok(data.hits.into_iter().next())
    }

    pub async fn details(&self, id: &str) -> ProviderResult<Option<Asset>> {
        Ok(self.lookup(id).await?.map(Hit::into_detail_asset))
    }

    /// Full-resolution image URL for a direct download.
    pub async fn download_url(&self, id: &str) -> ProviderResult<Option<String>> {
        Ok(self.lookup(id).await?.and_then(|hit| hit.image_url))
    }
}
