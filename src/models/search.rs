use serde::{Deserialize, Serialize};

use super::MediaKind;

/// Body of `/search/multi`; items stay raw so one bad item does not fail the page
#[derive(Debug, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Raw search item as served by TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub media_type: Option<String>,
}

/// Search hit returned to the admin form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub tmdb_id: String,
    pub title: String,
    pub name: String,
    pub overview: String,
    pub poster_path: String,
    pub poster_url: String,
    pub backdrop_path: String,
    pub release_date: String,
    pub first_air_date: String,
    /// First four characters of the release or first-air date
    pub year: String,
    pub genre_ids: Vec<i32>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub adult: Option<bool>,
    pub media_type: MediaKind,
}

impl SearchResult {
    /// Maps a raw TMDB item, joining the poster path onto `image_base_url`
    pub fn from_item(item: TmdbSearchItem, image_base_url: &str) -> Self {
        let title = item
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| item.name.clone())
            .unwrap_or_default();

        let release_date = item.release_date.unwrap_or_default();
        let first_air_date = item.first_air_date.unwrap_or_default();
        let year: String = [&release_date, &first_air_date]
            .into_iter()
            .find(|d| !d.is_empty())
            .map(|d| d.chars().take(4).collect())
            .unwrap_or_default();

        let poster_path = item.poster_path.unwrap_or_default();
        let poster_url = if poster_path.is_empty() {
            String::new()
        } else {
            format!("{}{}", image_base_url.trim_end_matches('/'), poster_path)
        };

        let media_type = item
            .media_type
            .as_deref()
            .unwrap_or_default()
            .parse::<MediaKind>()
            .unwrap_or_default();

        Self {
            tmdb_id: item.id.to_string(),
            title,
            name: item.name.unwrap_or_default(),
            overview: item.overview.unwrap_or_default(),
            poster_path,
            poster_url,
            backdrop_path: item.backdrop_path.unwrap_or_default(),
            release_date,
            first_air_date,
            year,
            genre_ids: item.genre_ids,
            popularity: item.popularity,
            vote_average: item.vote_average,
            vote_count: item.vote_count,
            adult: item.adult,
            media_type,
        }
    }
}
