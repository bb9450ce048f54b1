//! Freepik resources.

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{Asset, AssetSource, AssetType};
use crate::config::ProviderEndpoint;
use crate::providers::{endpoint, first_text, ProviderError, ProviderResult, RawId, SearchQuery, UpstreamClient};

pub const NAME: &str = "Freepik";

pub const KINDS: &[AssetType] = &[AssetType::Vector, AssetType::Illustration, AssetType::Template];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    id: RawId,
    title: Option<String>,
    description: Option<String>,
    resource_type: Option<String>,
    thumbnails: Option<Thumbnails>,
    image: Option<Value>,
    author: Option<Author>,
    download_count: Option<u64>,
    #[serde(default)]
    tags: Vec<Tag>,
    url: Option<String>,
    is_premium: Option<bool>,
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    original: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<String>,
}

/// Freepik sends tags either as plain strings or as `{ "name": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tag {
    Name(String),
    Object { name: String },
}

impl Tag {
    fn into_name(self) -> String {
        match self {
            Tag::Name(name) | Tag::Object { name } => name,
        }
    }
}

/// `image` is a bare URL in some payloads and `{ source: { url } }` in others.
fn image_url(image: Option<&Value>) -> Option<&str> {
    let image = image?;
    image
        .as_str()
        .or_else(|| image.pointer("/source/url").and_then(Value::as_str))
}

impl Resource {
    fn into_asset(self, query: &SearchQuery, kind: AssetType) -> Asset {
        let original = self.thumbnails.as_ref().and_then(|t| t.original.as_deref());
        let image = image_url(self.image.as_ref());
        let thumbnail = first_text([original, image]).unwrap_or_default();
        let preview = first_text([image, original]).unwrap_or_default();
        let id = self.id.to_string();

        Asset {
            id: AssetSource::Freepik.asset_id(&id),
            title: first_text([self.title.as_deref()]).unwrap_or_else(|| query.query.clone()),
            description: first_text([self.description.as_deref()])
                .unwrap_or_else(|| format!("{} design asset", kind.as_str())),
            kind: first_text([self.resource_type.as_deref()]).unwrap_or_else(|| kind.as_str().to_string()),
            thumbnail,
            preview,
            full: None,
            author: self
                .author
                .and_then(|a| a.name)
                .unwrap_or_else(|| "Freepik Creator".to_string()),
            downloads: self.download_count.unwrap_or(0),
            tags: self.tags.into_iter().map(Tag::into_name).collect(),
            formats: vec!["png".into(), "eps".into(), "svg".into()],
            source: AssetSource::Freepik,
            source_url: self.url.unwrap_or_default(),
            source_id: self.id,
            license: None,
            category: None,
            width: None,
            height: None,
            is_premium: Some(self.is_premium.unwrap_or(false)),
            rating: Some(self.rating.unwrap_or(0.0)),
        }
    }
}

/// Client for the Freepik resources API.
#[derive(Clone)]
pub struct Freepik {
    client: UpstreamClient,
    base_url: String,
    key: Option<String>,
}

impl Freepik {
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

    pub async fn search(&self, query: &SearchQuery, kind: AssetType) -> ProviderResult<Vec<Asset>> {
        let key = self.key.as_deref().ok_or(ProviderError::NotConfigured { provider: NAME })?;
        let url = endpoint(NAME, &self.base_url, &["v1", "resources"])?;

        let request = self
            .client
            .http()
            .get(url)
            .header("x-freepik-api-key", key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("query", query.query.clone()),
                ("type", kind.as_str().to_string()),
                ("page", query.page.to_string()),
                ("limit", query.per_page.to_string()),
            ]);

        let data: SearchResponse = self.client.get_json(NAME, request).await?;
        Ok(data
            .data
            .into_iter()
            .map(|resource| resource.into_asset(query, kind))
            .collect())
    }
}
