use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod comment;
pub mod content;
pub mod search;

pub use comment::{Comment, NewComment};
pub use content::{Content, ContentView, NewContent};
pub use search::{SearchResult, TmdbSearchItem};

/// Kind of catalog entry, which also selects the genre-id namespace
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    #[serde(rename = "movie", alias = "film")]
    Film,
    #[serde(rename = "tv", alias = "series")]
    Series,
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl MediaKind {
    /// Genre namespace for this kind, `None` for unknown entries
    pub fn genre_kind(self) -> Option<GenreKind> {
        match self {
            MediaKind::Film => Some(GenreKind::Film),
            MediaKind::Series => Some(GenreKind::Series),
            MediaKind::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Film => "movie",
            MediaKind::Series => "tv",
            MediaKind::Unknown => "unknown",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = std::convert::Infallible;

    /// Anything that is not a film or series discriminator maps to `Unknown`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => MediaKind::Film,
            "tv" | "series" => MediaKind::Series,
            _ => MediaKind::Unknown,
        })
    }
}

/// Genre namespaces served by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenreKind {
    Film,
    Series,
}

impl GenreKind {
    /// Path segment used by TMDB (`/genre/{segment}/list`)
    pub fn path_segment(self) -> &'static str {
        match self {
            GenreKind::Film => "movie",
            GenreKind::Series => "tv",
        }
    }
}

impl Display for GenreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenreKind::Film => write!(f, "film"),
            GenreKind::Series => write!(f, "series"),
        }
    }
}

/// Genre record as served by `/genre/{kind}/list`
///
/// Both fields are optional so that one bad record does not fail the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `/genre/{kind}/list`
#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<serde_json::Value>,
}
