use std::cmp::Ordering;

use serde::Deserialize;

use crate::{
    models::{Content, ContentView, MediaKind},
    services::genres::GenreResolver,
};

/// Sort orders offered by the catalog listing
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    /// Highest personal rating first
    Rating,
    /// Alphabetical by display title
    Title,
    /// Most recent release year first
    Year,
}

/// Filters and sort order for browsing the catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub genre: Option<i32>,
    pub tag: Option<String>,
    pub media_type: Option<MediaKind>,
    /// Case-insensitive match against title or series name
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

impl CatalogQuery {
    fn matches(&self, content: &Content) -> bool {
        if let Some(genre) = self.genre {
            if !content.genre_ids.contains(&genre) {
                return false;
            }
        }

        if let Some(tag) = self.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            if !content.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }

        if let Some(kind) = self.media_type {
            if content.media_type != kind {
                return false;
            }
        }

        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            let hit = content.title.to_lowercase().contains(&q)
                || content.name.to_lowercase().contains(&q);
            if !hit {
                return false;
            }
        }

        true
    }
}

fn compare(sort: SortKey, a: &Content, b: &Content) -> Ordering {
    match sort {
        SortKey::Newest => b.created_at.cmp(&a.created_at),
        SortKey::Oldest => a.created_at.cmp(&b.created_at),
        SortKey::Rating => b
            .my_rating
            .total_cmp(&a.my_rating)
            .then_with(|| b.created_at.cmp(&a.created_at)),
        SortKey::Title => a
            .display_title()
            .to_lowercase()
            .cmp(&b.display_title().to_lowercase()),
        // Records without a year go last
        SortKey::Year => match (a.release_year(), b.release_year()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Applies the query's filters conjunctively, then sorts
pub fn filter_and_sort(contents: Vec<Content>, query: &CatalogQuery) -> Vec<Content> {
    let mut filtered: Vec<Content> = contents.into_iter().filter(|c| query.matches(c)).collect();
    filtered.sort_by(|a, b| compare(query.sort, a, b));
    filtered
}

/// Attaches resolved genre names to each record
///
/// The snapshot is refreshed at most once for the whole batch; when that
/// fails every record renders without genre names.
pub async fn annotate(contents: Vec<Content>, resolver: &GenreResolver) -> Vec<ContentView> {
    let wants_genres = contents
        .iter()
        .any(|c| !c.genre_ids.is_empty() && c.media_type.genre_kind().is_some());
    let usable = wants_genres && resolver.refresh_for_batch().await;

    let mut views = Vec::with_capacity(contents.len());
    for content in contents {
        let genre_names = match content.media_type.genre_kind() {
            Some(kind) if usable => resolver.lookup(&content.genre_ids, kind).await,
            _ => Vec::new(),
        };
        views.push(ContentView {
            content,
            genre_names,
        });
    }
    views
}

pub async fn annotate_one(content: Content, resolver: &GenreResolver) -> ContentView {
    let genre_names = resolver
        .resolve_names(&content.genre_ids, content.media_type)
        .await;
    ContentView {
        content,
        genre_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Genre, GenreKind, NewContent};
    use crate::services::genres::DEFAULT_GENRE_TTL;
    use crate::services::providers::MockMetadataProvider;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn content(title: &str, rating: f64, genres: &[i32], tags: &[&str], kind: MediaKind) -> Content {
        Content::new(NewContent {
            tmdb_id: title.to_lowercase(),
            title: title.to_string(),
            genre_ids: genres.to_vec(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            media_type: kind,
            my_note: "note".to_string(),
            my_rating: rating,
            ..Default::default()
        })
    }

    fn sample() -> Vec<Content> {
        let now = Utc::now();
        let mut a = content("Inception", 4.5, &[28, 878], &["heist"], MediaKind::Film);
        a.year = "2010".to_string();
        a.created_at = now - Duration::days(3);
        let mut b = content("Dark", 5.0, &[18, 10765], &["time-travel"], MediaKind::Series);
        b.year = "2017".to_string();
        b.created_at = now - Duration::days(2);
        let mut c = content("amélie", 4.0, &[35, 10749], &["Paris", "heist"], MediaKind::Film);
        c.created_at = now - Duration::days(1);
        vec![a, b, c]
    }

    fn titles(contents: &[Content]) -> Vec<&str> {
        contents.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let result = filter_and_sort(sample(), &CatalogQuery::default());
        assert_eq!(titles(&result), vec!["amélie", "Dark", "Inception"]);
    }

    #[test]
    fn test_sort_by_rating() {
        let query = CatalogQuery {
            sort: SortKey::Rating,
            ..Default::default()
        };
        let result = filter_and_sort(sample(), &query);
        assert_eq!(titles(&result), vec!["Dark", "Inception", "amélie"]);
    }

    #[test]
    fn test_sort_by_title_ignores_case() {
        let query = CatalogQuery {
            sort: SortKey::Title,
            ..Default::default()
        };
        let result = filter_and_sort(sample(), &query);
        assert_eq!(titles(&result), vec!["amélie", "Dark", "Inception"]);
    }

    #[test]
    fn test_sort_by_year_puts_unknown_last() {
        let query = CatalogQuery {
            sort: SortKey::Year,
            ..Default::default()
        };
        let result = filter_and_sort(sample(), &query);
        assert_eq!(titles(&result), vec!["Dark", "Inception", "amélie"]);
    }

    #[test]
    fn test_filters_compose() {
        let query = CatalogQuery {
            tag: Some("HEIST".to_string()),
            media_type: Some(MediaKind::Film),
            sort: SortKey::Oldest,
            ..Default::default()
        };
        let result = filter_and_sort(sample(), &query);
        assert_eq!(titles(&result), vec!["Inception", "amélie"]);

        let query = CatalogQuery {
            tag: Some("heist".to_string()),
            genre: Some(35),
            ..Default::default()
        };
        let result = filter_and_sort(sample(), &query);
        assert_eq!(titles(&result), vec!["amélie"]);
    }

    #[test]
    fn test_text_query_matches_title() {
        let query = CatalogQuery {
            q: Some("  incep ".to_string()),
            ..Default::default()
        };
        let result = filter_and_sort(sample(), &query);
        assert_eq!(titles(&result), vec!["Inception"]);
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = CatalogQuery {
            tag: Some("  ".to_string()),
            q: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(sample(), &query).len(), 3);
    }

    #[test]
    fn test_query_string_deserialization() {
        let query: CatalogQuery =
            serde_json::from_str(r#"{"genre": 18, "media_type": "tv", "sort": "rating"}"#).unwrap();
        assert_eq!(query.genre, Some(18));
        assert_eq!(query.media_type, Some(MediaKind::Series));
        assert_eq!(query.sort, SortKey::Rating);
    }

    #[tokio::test]
    async fn test_annotate_resolves_each_kind() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_list_genres()
            .times(2)
            .returning(|kind| {
                let (id, name) = match kind {
                    GenreKind::Film => (28, "Action"),
                    GenreKind::Series => (10765, "Sci-Fi & Fantasy"),
                };
                Ok(vec![Genre {
                    id: Some(id),
                    name: Some(name.to_string()),
                }])
            });
        provider.expect_name().return_const("mock");
        let resolver = GenreResolver::new(Arc::new(provider), DEFAULT_GENRE_TTL);

        let views = annotate(sample(), &resolver).await;

        assert_eq!(views[0].genre_names, vec!["Action"]);
        assert_eq!(views[1].genre_names, vec!["Sci-Fi & Fantasy"]);
        assert!(views[2].genre_names.is_empty());
    }

    #[tokio::test]
    async fn test_annotate_tries_one_refresh_per_batch() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_list_genres()
            .withf(|kind| *kind == GenreKind::Film)
            .times(1)
            .returning(|_| Err(AppError::ProviderUnavailable("HTTP 503".to_string())));
        provider
            .expect_list_genres()
            .withf(|kind| *kind == GenreKind::Series)
            .times(0..=1)
            .returning(|_| Err(AppError::ProviderUnavailable("HTTP 503".to_string())));
        let resolver = GenreResolver::new(Arc::new(provider), DEFAULT_GENRE_TTL);

        let views = annotate(sample(), &resolver).await;

        assert_eq!(views.len(), 3);
        assert!(views.iter().all(|v| v.genre_names.is_empty()));
    }

    #[tokio::test]
    async fn test_annotate_skips_refresh_without_genre_ids() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_list_genres().times(0);
        let resolver = GenreResolver::new(Arc::new(provider), DEFAULT_GENRE_TTL);

        let plain = content("Untagged", 3.0, &[], &[], MediaKind::Film);
        let views = annotate(vec![plain], &resolver).await;

        assert!(views[0].genre_names.is_empty());
        assert!(resolver.snapshot().await.is_none());
    }
}
