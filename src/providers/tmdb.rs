//! TMDB movie listings.

use serde::Deserialize;

use crate::catalog::{Movie, MoviePage};
use crate::config::ProviderEndpoint;
use crate::providers::{endpoint, ProviderError, ProviderResult, UpstreamClient};

pub const NAME: &str = "TMDB";

const GENRES: &[(&str, u32)] = &[
    ("action", 28),
    ("comedy", 35),
    ("horror", 27),
    ("sci-fi", 878),
    ("animation", 16),
    ("drama", 18),
    ("romance", 10749),
    ("thriller", 53),
    ("adventure", 12),
    ("fantasy", 14),
];

/// TMDB genre id for a genre name, ignoring case.
pub fn genre_id(name: &str) -> Option<u32> {
    GENRES
        .iter()
        .find(|(genre, _)| genre.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<Movie>,
    total_pages: Option<u32>,
    total_results: Option<u64>,
}

impl ListResponse {
    fn into_page(self, page: u32) -> MoviePage {
        MoviePage {
            movies: self.results,
            total_pages: self.total_pages.filter(|p| *p > 0).unwrap_or(1),
            current_page: page,
            total_results: None,
            genre: None,
        }
    }
}

/// Client for the TMDB v3 API.
#[derive(Clone)]
pub struct Tmdb {
    client: UpstreamClient,
    base_url: String,
    key: Option<String>,
}

impl Tmdb {
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

    async fn list(&self, segments: &[&str], params: &[(&str, String)], page: u32) -> ProviderResult<ListResponse> {
        let key = self.key.as_deref().ok_or(ProviderError::NotConfigured { provider: NAME })?;
        let url = endpoint(NAME, &self.base_url, segments)?;

        let request = self
            .client
            .http()
            .get(url)
            .query(&[("api_key", key.to_string()), ("page", page.to_string())])
            .query(params);

        self.client.get_json(NAME, request).await
    }

    pub async fn popular(&self, page: u32) -> ProviderResult<MoviePage> {
        Ok(self.list(&["3", "movie", "popular"], &[], page).await?.into_page(page))
    }

    pub async fn top_rated(&self, page: u32) -> ProviderResult<MoviePage> {
        Ok(self.list(&["3", "movie", "top_rated"], &[], page).await?.into_page(page))
    }

    pub async fn trending(&self, page: u32) -> ProviderResult<MoviePage> {
        Ok(self.list(&["3", "trending", "movie", "week"], &[], page).await?.into_page(page))
    }

    pub async fn search(&self, query: &str, page: u32) -> ProviderResult<MoviePage> {
        let data = self
            .list(&["3", "search", "movie"], &[("query", query.to_string())], page)
            .await?;
        let total_results = data.total_results.unwrap_or(0);
        let mut movies = data.into_page(page);
        movies.total_results = Some(total_results);
        Ok(movies)
    }

    /// Most popular movies in one genre.
    pub async fn discover(&self, genre_id: u32, page: u32) -> ProviderResult<MoviePage> {
        let params = [
            ("with_genres", genre_id.to_string()),
            ("sort_by", "popularity.desc".to_string()),
        ];
        Ok(self.list(&["3", "discover", "movie"], &params, page).await?.into_page(page))
    }
}
