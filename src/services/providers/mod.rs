/// Metadata provider abstraction
///
/// The catalog pulls titles, posters and genre taxonomies from one external
/// provider. Search results feed the admin form; genre lists feed the
/// [`GenreResolver`](crate::services::genres::GenreResolver) snapshot.
use crate::{
    error::AppResult,
    models::{Genre, GenreKind, SearchResult},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for external metadata providers
///
/// Both operations share one credential; a provider without one must fail
/// every call with [`AppError::MissingCredential`](crate::error::AppError::MissingCredential)
/// before touching the network.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Free-text search across films and series
    async fn search(&self, query: &str) -> AppResult<Vec<SearchResult>>;

    /// Full genre list for one media kind
    ///
    /// Records may lack an id or a name; callers skip those.
    async fn list_genres(&self, kind: GenreKind) -> AppResult<Vec<Genre>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
