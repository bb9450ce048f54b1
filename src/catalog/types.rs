//! Unified response shapes returned to clients.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An identifier some providers send as a number and others as a string.
/// It is written back out in the form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(u64),
    Text(String),
}

impl RawId {
    /// Numeric value of an id that may arrive quoted.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            RawId::Num(n) => Some(*n),
            RawId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Num(n) => write!(f, "{}", n),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// Which stock-photo provider serves an image search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Unsplash,
    Pexels,
}

impl ImageSource {
    /// Parse a `source` query value; anything but `pexels` means Unsplash.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("pexels") => ImageSource::Pexels,
            _ => ImageSource::Unsplash,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Unsplash => "unsplash",
            ImageSource::Pexels => "pexels",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImageSource::Unsplash => "Unsplash",
            ImageSource::Pexels => "Pexels",
        }
    }
}

/// A stock photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: RawId,
    pub source: ImageSource,
    pub url: String,
    pub thumb: String,
    pub full: String,
    pub download: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_location: Option<String>,
    pub description: String,
    pub photographer: String,
    pub photographer_url: String,
    pub width: u32,
    pub height: u32,
}

/// One page of image search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePage {
    pub images: Vec<Image>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

/// Kind of design asset a search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    All,
    Vector,
    Illustration,
    Photo,
    Template,
}

impl AssetType {
    /// Parse a `type` query value, falling back to `All`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("vector") => AssetType::Vector,
            Some("illustration") => AssetType::Illustration,
            Some("photo") => AssetType::Photo,
            Some("template") => AssetType::Template,
            _ => AssetType::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::All => "all",
            AssetType::Vector => "vector",
            AssetType::Illustration => "illustration",
            AssetType::Photo => "photo",
            AssetType::Template => "template",
        }
    }

    /// Whether a provider serving `kinds` should be queried for this type.
    pub fn wants(&self, kinds: &[AssetType]) -> bool {
        *self == AssetType::All || kinds.contains(self)
    }
}

/// Which design-asset provider an asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    Pixabay,
    Openverse,
    Iconfinder,
    Freepik,
}

impl AssetSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pixabay" => Some(AssetSource::Pixabay),
            "openverse" => Some(AssetSource::Openverse),
            "iconfinder" => Some(AssetSource::Iconfinder),
            "freepik" => Some(AssetSource::Freepik),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSource::Pixabay => "pixabay",
            AssetSource::Openverse => "openverse",
            AssetSource::Iconfinder => "iconfinder",
            AssetSource::Freepik => "freepik",
        }
    }

    /// Build the namespaced asset id, e.g. `pixabay-123`.
    pub fn asset_id(&self, source_id: &str) -> String {
        format!("{}-{}", self.as_str(), source_id)
    }

    /// Accept either a raw provider id or a namespaced asset id.
    pub fn strip_prefix<'a>(&self, id: &'a str) -> &'a str {
        id.strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(id)
    }
}

/// A design asset in the unified shape every provider is mapped into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub thumbnail: String,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    pub author: String,
    pub downloads: u64,
    pub tags: Vec<String>,
    pub formats: Vec<String>,
    pub source: AssetSource,
    pub source_url: String,
    pub source_id: RawId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// One page of aggregated design-asset results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPage {
    pub assets: Vec<Asset>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: usize,
    pub query: String,
    #[serde(rename = "type")]
    pub kind: AssetType,
}

/// A TMDB result object, forwarded exactly as TMDB sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Movie(pub Map<String, Value>);

impl Movie {
    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }
}

/// One page of movies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total_pages: u32,
    pub current_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}
