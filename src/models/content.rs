use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MediaKind;

/// A curated catalog entry with the administrator's personal annotations
///
/// Every descriptive field carries a serde default so that records written
/// before the extended TMDB fields existed still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub id: Uuid,
    pub tmdb_id: String,
    pub title: String,
    /// Series name as served by TMDB (films use `title`)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub first_air_date: String,
    #[serde(default)]
    pub poster_path: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub backdrop_path: String,
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
    pub media_type: MediaKind,
    #[serde(default)]
    pub year: String,
    pub my_note: String,
    pub my_rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a content record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewContent {
    pub tmdb_id: String,
    pub title: String,
    pub name: String,
    pub overview: String,
    pub release_date: String,
    pub first_air_date: String,
    pub poster_path: String,
    pub poster_url: String,
    pub backdrop_path: String,
    pub genre_ids: Vec<i32>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub adult: Option<bool>,
    pub media_type: MediaKind,
    pub year: String,
    pub my_note: String,
    pub my_rating: f64,
    pub tags: Vec<String>,
}

impl Content {
    /// Creates a record from validated input, stamped with the current time
    pub fn new(input: NewContent) -> Self {
        let now = Utc::now();
        let mut content = Self {
            id: Uuid::new_v4(),
            tmdb_id: String::new(),
            title: String::new(),
            name: String::new(),
            overview: String::new(),
            release_date: String::new(),
            first_air_date: String::new(),
            poster_path: String::new(),
            poster_url: String::new(),
            backdrop_path: String::new(),
            genre_ids: Vec::new(),
            popularity: None,
            vote_average: None,
            vote_count: None,
            adult: None,
            media_type: MediaKind::Unknown,
            year: String::new(),
            my_note: String::new(),
            my_rating: 0.0,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        content.apply(input);
        content
    }

    /// Replaces every editable field and bumps `updated_at`
    pub fn apply(&mut self, input: NewContent) {
        self.tmdb_id = input.tmdb_id;
        self.title = input.title;
        self.name = input.name;
        self.overview = input.overview;
        self.release_date = input.release_date;
        self.first_air_date = input.first_air_date;
        self.poster_path = input.poster_path;
        self.poster_url = input.poster_url;
        self.backdrop_path = input.backdrop_path;
        self.genre_ids = input.genre_ids;
        self.popularity = input.popularity;
        self.vote_average = input.vote_average;
        self.vote_count = input.vote_count;
        self.adult = input.adult;
        self.media_type = input.media_type;
        self.year = input.year;
        self.my_note = input.my_note;
        self.my_rating = input.my_rating;
        self.tags = input.tags;
        self.updated_at = Utc::now();
    }

    /// Display title, falling back to the series name
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    /// Release year as a number, from `year` or either date field
    pub fn release_year(&self) -> Option<i32> {
        [&self.year, &self.release_date, &self.first_air_date]
            .into_iter()
            .filter_map(|s| s.get(..4))
            .find_map(|y| y.parse().ok())
    }
}

/// A content record with its genre ids resolved to display names
#[derive(Debug, Clone, Serialize)]
pub struct ContentView {
    #[serde(flatten)]
    pub content: Content,
    pub genre_names: Vec<String>,
}
