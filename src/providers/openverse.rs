//! OpenVerse Creative Commons images. No key required.

use serde::Deserialize;

use crate::catalog::{Asset, AssetSource, AssetType, RawId};
use crate::config::ProviderEndpoint;
use crate::providers::{endpoint, first_text, ProviderResult, SearchQuery, UpstreamClient};

pub const NAME: &str = "OpenVerse";

pub const KINDS: &[AssetType] = &[AssetType::Photo, AssetType::Illustration];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    id: String,
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    creator: String,
    download_count: Option<u64>,
    #[serde(default)]
    tags: Vec<Tag>,
    license: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

impl Item {
    fn into_asset(self, title_fallback: &str, description_fallback: &str) -> Asset {
        Asset {
            id: AssetSource::Openverse.asset_id(&self.id),
            title: first_text([self.title.as_deref()]).unwrap_or_else(|| title_fallback.to_string()),
            description: first_text([self.description.as_deref()])
                .unwrap_or_else(|| description_fallback.to_string()),
            kind: "photo".to_string(),
            thumbnail: self.thumbnail,
            preview: self.url.clone(),
            full: None,
            author: self.creator,
            downloads: self.download_count.unwrap_or(0),
            tags: self.tags.into_iter().map(|t| t.name).collect(),
            formats: vec!["jpg".into(), "png".into()],
            source: AssetSource::Openverse,
            source_url: self.url,
            source_id: RawId::Text(self.id),
            license: Some(first_text([self.license.as_deref()]).unwrap_or_else(|| "CC0".to_string())),
            category: None,
            width: None,
            height: None,
            is_premium: None,
            rating: None,
        }
    }
}

/// Client for the OpenVerse image API.
#[derive(Clone)]
pub struct Openverse {
    client: UpstreamClient,
    base_url: String,
    key: Option<String>,
}

impl Openverse {
    pub fn new(client: UpstreamClient, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: endpoint.base_url.clone(),
            key: endpoint.key().map(str::to_string),
        }
    }

    /// Anonymous access works; a key only raises the rate limit.
    pub fn is_configured(&self) -> bool {
        true
    }

    fn get(&self, url: url::Url) -> reqwest::RequestBuilder {
        let request = self.client.http().get(url);
        match &self.key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> ProviderResult<Vec<Asset>> {
        let url = endpoint(NAME, &self.base_url, &["v1", "images", ""])?;
        let request = self.get(url).query(&[
            ("q", query.query.clone()),
            ("page", query.page.to_string()),
            ("page_size", query.per_page.to_string()),
        ]);

        let data: SearchResponse = self.client.get_json(NAME, request).await?;
        Ok(data
            .results
            .into_iter()
            .map(|item| item.into_asset(&query.query, "Design asset"))
            .collect())
    }

    async fn lookup(&self, id: &str) -> ProviderResult<Option<Item>> {
        let url = endpoint(NAME, &self.base_url, &["v1", "images", AssetSource::Openverse.strip_prefix(id)])?;
        match self.client.get_json(NAME, self.get(url)).await {
            Ok(item) => Ok(Some(item)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn details(&self, id: &str) -> ProviderResult<Option<Asset>> {
        Ok(self.lookup(id).await?.map(|item| {
            let mut asset = item.into_asset("Design Asset", "Creative Commons licensed asset");
            asset.full = Some(asset.preview.clone());
            asset.category = Some("Photo".to_string());
            asset
        }))
    }

    pub async fn download_url(&self, id: &str) -> ProviderResult<Option<String>> {
        Ok(self
            .lookup(id)
            .await?
            .map(|item| item.url)
            .filter(|url| !url.is_empty()))
    }
}
