//! IconFinder vector icons.

use serde::Deserialize;

use crate::catalog::{Asset, AssetSource, AssetType, RawId};
use crate::config::ProviderEndpoint;
use crate::providers::{endpoint, ProviderError, ProviderResult, SearchQuery, UpstreamClient};

pub const NAME: &str = "IconFinder";

pub const KINDS: &[AssetType] = &[AssetType::Vector];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    icons: Vec<Icon>,
}

#[derive(Debug, Deserialize)]
struct Icon {
    icon_id: u64,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    raster_sizes: Vec<Size>,
    #[serde(default)]
    vector_sizes: Vec<Size>,
    creator: Option<Creator>,
    urls: Option<Urls>,
    #[serde(alias = "is_premium")]
    premium: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Size {
    #[serde(default)]
    formats: Vec<Preview>,
}

#[derive(Debug, Deserialize)]
struct Preview {
    #[serde(default)]
    preview_url: String,
}

#[derive(Debug, Deserialize)]
struct Creator {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Urls {
    #[serde(default)]
    page: String,
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    #[serde(default)]
    formats: Vec<DownloadFormat>,
}

#[derive(Debug, Deserialize)]
struct DownloadFormat {
    #[serde(default)]
    format: String,
    download_url: Option<String>,
}

fn first_preview(sizes: &[Size]) -> String {
    sizes
        .first()
        .and_then(|s| s.formats.first())
        .map(|f| f.preview_url.clone())
        .unwrap_or_default()
}

impl Icon {
    fn into_asset(self, title_fallback: &str, description: &str) -> Asset {
        let id = self.icon_id.to_string();
        Asset {
            id: AssetSource::Iconfinder.asset_id(&id),
            title: self.tags.first().cloned().unwrap_or_else(|| title_fallback.to_string()),
            description: description.to_string(),
            kind: "vector".to_string(),
            thumbnail: first_preview(&self.raster_sizes),
            preview: first_preview(&self.vector_sizes),
            full: None,
            author: self
                .creator
                .and_then(|c| c.name)
                .unwrap_or_else(|| "IconFinder".to_string()),
            downloads: 0,
            tags: self.tags,
            formats: vec!["svg".into(), "eps".into()],
            source: AssetSource::Iconfinder,
            source_url: self.urls.map(|u| u.page).unwrap_or_default(),
            source_id: RawId::Num(self.icon_id),
            license: None,
            category: None,
            width: None,
            height: None,
            is_premium: self.premium,
            rating: None,
        }
    }
}

/// Pick the download URL for `format`, else the first one offered.
fn pick_format(formats: Vec<DownloadFormat>, format: &str) -> Option<String> {
    let wanted = formats
        .iter()
        .position(|f| f.format.eq_ignore_ascii_case(format) && f.download_url.is_some());
    match wanted {
        Some(index) => formats.into_iter().nth(index).and_then(|f| f.download_url),
        None => formats.into_iter().next().and_then(|f| f.download_url),
    }
}

/// Client for the IconFinder v4 API.
#[derive(Clone)]
pub struct Iconfinder {
    client: UpstreamClient,
    base_url: String,
    key: Option<String>,
}

impl Iconfinder {
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

    fn get(&self, segments: &[&str]) -> ProviderResult<reqwest::RequestBuilder> {
        let key = self.key.as_deref().ok_or(ProviderError::NotConfigured { provider: NAME })?;
        let url = endpoint(NAME, &self.base_url, segments)?;
        Ok(self.client.http().get(url).bearer_auth(key))
    }

    pub async fn search(&self, query: &SearchQuery) -> ProviderResult<Vec<Asset>> {
        let request = self.get(&["v4", "icons", "search"])?.query(&[
            ("query", query.query.clone()),
            ("limit", query.per_page.to_string()),
            ("offset", query.offset().to_string()),
        ]);

        let data: SearchResponse = self.client.get_json(NAME, request).await?;
        Ok(data
            .icons
            .into_iter()
            .map(|icon| icon.into_asset(&query.query, "SVG icon vector"))
            .collect())
    }

    pub async fn details(&self, id: &str) -> ProviderResult<Option<Asset>> {
        let request = self.get(&["v4", "icons", AssetSource::Iconfinder.strip_prefix(id)])?;
        match self.client.get_json::<Icon>(NAME, request).await {
            Ok(icon) => {
                let mut asset = icon.into_asset("SVG Icon", "High-quality SVG icon vector");
                asset.category = Some("Vector".to_string());
                asset.license = Some("Various".to_string());
                Ok(Some(asset))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn download_url(&self, id: &str, format: &str) -> ProviderResult<Option<String>> {
        let request = self.get(&["v4", "icons", AssetSource::Iconfinder.strip_prefix(id), "download"])?;
        match self.client.get_json::<DownloadResponse>(NAME, request).await {
            Ok(data) => Ok(pick_format(data.formats, format)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
