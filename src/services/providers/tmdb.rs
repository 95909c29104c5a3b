/// TMDB (The Movie Database) provider
///
/// API flow:
/// 1. Search: `/search/multi` → mixed film/series/person hits
/// 2. Genres: `/genre/{movie|tv}/list` → `{id, name}` taxonomy per kind
///
/// Authentication is the v3 `api_key` query parameter.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        search::TmdbSearchResponse, Genre, GenreKind, GenreListResponse, SearchResult,
        TmdbSearchItem,
    },
    services::providers::MetadataProvider,
};

/// Error body TMDB sends with non-2xx statuses
#[derive(Debug, Deserialize)]
struct TmdbErrorResponse {
    #[serde(default)]
    status_code: i64,
    #[serde(default)]
    status_message: String,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_base_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        http_client: HttpClient,
        api_key: Option<String>,
        api_url: String,
        image_base_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url,
            language,
        }
    }

    /// Builds a provider with a timeout-bounded HTTP client
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = build_http_client(config.http_timeout())?;

        if config.tmdb_api_key.is_none() {
            tracing::warn!("TMDB_API_KEY is not set; search and genre lookups will fail");
        }

        Ok(Self::new(
            http_client,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_base_url.clone(),
            config.tmdb_language.clone(),
        ))
    }

    /// Sends an authenticated GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingCredential)?;

        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(path = %path, error = %e, "TMDB request failed");
                AppError::ProviderUnavailable(format!("request to {} failed: {}", path, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB API request failed"
            );
            let message = match serde_json::from_str::<TmdbErrorResponse>(&body) {
                Ok(err) if !err.status_message.is_empty() => format!(
                    "TMDB returned status {} (code {}): {}",
                    status, err.status_code, err.status_message
                ),
                _ => format!("TMDB returned status {}", status),
            };
            return Err(AppError::ProviderUnavailable(message));
        }

        let body = response.text().await.map_err(|e| {
            AppError::ProviderUnavailable(format!("failed to read body of {}: {}", path, e))
        })?;

        serde_json::from_str(&body)
            .map_err(|e| AppError::MalformedResponse(format!("{}: {}", path, e)))
    }
}

/// Shared reqwest client with a request timeout
pub fn build_http_client(timeout: Duration) -> AppResult<HttpClient> {
    HttpClient::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(AppError::from)
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response: TmdbSearchResponse = self
            .get_json(
                "/search/multi",
                &[("query", query), ("include_adult", "false"), ("page", "1")],
            )
            .await?;

        let total = response.results.len();
        let results: Vec<SearchResult> = response
            .results
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<TmdbSearchItem>(raw) {
                Ok(item) => Some(SearchResult::from_item(item, &self.image_base_url)),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed search item");
                    None
                }
            })
            .collect();

        tracing::info!(
            query = %query,
            results = results.len(),
            skipped = total - results.len(),
            provider = self.name(),
            "Title search completed"
        );

        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list_genres(&self, kind: GenreKind) -> AppResult<Vec<Genre>> {
        let path = format!("/genre/{}/list", kind.path_segment());
        let response: GenreListResponse = self.get_json(&path, &[]).await?;

        let genres: Vec<Genre> = response
            .genres
            .into_iter()
            .filter_map(|raw| serde_json::from_value::<Genre>(raw).ok())
            .collect();

        tracing::debug!(kind = %kind, genres = genres.len(), "Genre list fetched");

        Ok(genres)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(api_url: String, api_key: Option<&str>) -> TmdbProvider {
        TmdbProvider::new(
            reqwest::Client::new(),
            api_key.map(str::to_string),
            api_url,
            "https://image.tmdb.org/t/p/w500".to_string(),
            "ko-KR".to_string(),
        )
    }

    #[tokio::test]
    async fn test_search_sends_expected_query() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "page": 1,
            "results": [
                {"id": 27205, "title": "Inception", "release_date": "2010-07-15",
                 "poster_path": "/inception.jpg", "genre_ids": [28, 878], "media_type": "movie"},
                {"id": 70523, "name": "Dark", "first_air_date": "2017-12-01", "media_type": "tv"}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .and(query_param("api_key", "test_key"))
            .and(query_param("language", "ko-KR"))
            .and(query_param("query", "inception"))
            .and(query_param("include_adult", "false"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(server.uri(), Some("test_key"));
        let results = provider.search("  inception ").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].tmdb_id, "27205");
        assert_eq!(results[0].poster_url, "https://image.tmdb.org/t/p/w500/inception.jpg");
        assert_eq!(results[1].title, "Dark");
    }

    #[tokio::test]
    async fn test_search_skips_malformed_items() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "results": [
                {"title": "missing id"},
                {"id": "not-a-number", "title": "bad id"},
                {"id": 603, "title": "The Matrix", "media_type": "movie"}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = create_test_provider(server.uri(), Some("test_key"));
        let results = provider.search("matrix").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn test_search_without_key_fails_fast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = create_test_provider(server.uri(), None);
        let result = provider.search("matrix").await;

        assert!(matches!(result, Err(AppError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_search_empty_query_is_invalid() {
        let provider = create_test_provider("http://test.local".to_string(), Some("k"));
        let result = provider.search("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_error_status_carries_provider_message() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key.",
            "success": false
        });

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(body))
            .mount(&server)
            .await;

        let provider = create_test_provider(server.uri(), Some("bad_key"));
        let err = provider.search("matrix").await.unwrap_err();

        match err {
            AppError::ProviderUnavailable(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = create_test_provider(server.uri(), Some("test_key"));
        let result = provider.list_genres(GenreKind::Film).await;

        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_list_genres_per_kind() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "genres": [{"id": 18, "name": "드라마"}, {"id": 35, "name": "코미디"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/genre/tv/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "genres": [{"id": 10765, "name": "Sci-Fi & Fantasy"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = create_test_provider(server.uri(), Some("test_key"));

        let film = provider.list_genres(GenreKind::Film).await.unwrap();
        let series = provider.list_genres(GenreKind::Series).await.unwrap();

        assert_eq!(film.len(), 2);
        assert_eq!(film[0].id, Some(18));
        assert_eq!(film[0].name.as_deref(), Some("드라마"));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].id, Some(10765));
    }

    #[tokio::test]
    async fn test_list_genres_keeps_partial_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "genres": [{"id": 18}, {"name": "No id"}, {"id": "x", "name": "Bad"}, {"id": 35, "name": "Comedy"}]
            })))
            .mount(&server)
            .await;

        let provider = create_test_provider(server.uri(), Some("test_key"));
        let genres = provider.list_genres(GenreKind::Film).await.unwrap();

        // Wrong-typed records are dropped here; missing fields are left to the caller
        assert_eq!(genres.len(), 3);
        assert_eq!(genres[2].name.as_deref(), Some("Comedy"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        let provider = create_test_provider("http://127.0.0.1:9".to_string(), Some("k"));
        let result = provider.list_genres(GenreKind::Series).await;
        assert!(matches!(result, Err(AppError::ProviderUnavailable(_))));
    }
}
