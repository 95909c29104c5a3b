//! Genre-id → display-name resolution backed by a TTL snapshot.
//!
//! The snapshot holds one mapping per genre namespace (film, series) and is
//! swapped as a whole: readers either see both mappings from the same refresh
//! or the previous pair. Refreshes are demand-driven; there is no timer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreKind, MediaKind},
    services::providers::MetadataProvider,
};

/// Default snapshot lifetime (7 days)
pub const DEFAULT_GENRE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Source of "now", swappable in tests
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Genre mappings for both namespaces, fetched together
#[derive(Debug, Clone, PartialEq)]
pub struct GenreSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub film_genres: HashMap<i32, String>,
    pub series_genres: HashMap<i32, String>,
}

impl GenreSnapshot {
    pub fn genres_for(&self, kind: GenreKind) -> &HashMap<i32, String> {
        match kind {
            GenreKind::Film => &self.film_genres,
            GenreKind::Series => &self.series_genres,
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// Builds an id → name mapping, skipping records missing either field
pub fn build_mapping(genres: Vec<Genre>) -> HashMap<i32, String> {
    genres
        .into_iter()
        .filter_map(|g| match (g.id, g.name) {
            (Some(id), Some(name)) => Some((id, name)),
            _ => None,
        })
        .collect()
}

/// Resolves genre ids to names for rendering
///
/// Constructed once at startup and shared through `AppState`.
pub struct GenreResolver {
    provider: Arc<dyn MetadataProvider>,
    ttl: chrono::Duration,
    clock: Clock,
    snapshot: RwLock<Option<Arc<GenreSnapshot>>>,
    /// Serializes refreshes; holds the outcome of the last attempt
    refresh_gate: Mutex<RefreshOutcome>,
    /// Completed refresh attempts, bumped while holding the gate
    attempts: AtomicU64,
}

/// Result of the most recent refresh, handed to callers that queued behind it
#[derive(Default)]
struct RefreshOutcome {
    error: Option<AppError>,
}

impl GenreResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock: Arc::new(Utc::now),
            snapshot: RwLock::new(None),
            refresh_gate: Mutex::new(RefreshOutcome::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Replaces the wall clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current snapshot, `None` until the first successful refresh
    pub async fn snapshot(&self) -> Option<Arc<GenreSnapshot>> {
        self.snapshot.read().await.clone()
    }

    async fn is_fresh(&self) -> bool {
        let now = (self.clock)();
        self.snapshot
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.is_fresh(now, self.ttl))
    }

    /// Refreshes the snapshot when it is missing or older than the TTL
    ///
    /// Both namespaces are fetched concurrently and committed together. On
    /// any failure the previous snapshot stays in place and the error is
    /// returned. Callers that queued behind a running refresh get its outcome
    /// instead of starting another one.
    pub async fn ensure_fresh(&self) -> AppResult<()> {
        if self.is_fresh().await {
            return Ok(());
        }

        let seen = self.attempts.load(AtomicOrdering::Acquire);
        let mut gate = self.refresh_gate.lock().await;

        if self.attempts.load(AtomicOrdering::Acquire) != seen {
            return match &gate.error {
                None => Ok(()),
                Some(e) => Err(replay(e)),
            };
        }
        if self.is_fresh().await {
            return Ok(());
        }

        let result = self.refresh().await;
        gate.error = result.as_ref().err().map(replay);
        self.attempts.fetch_add(1, AtomicOrdering::Release);
        result
    }

    async fn refresh(&self) -> AppResult<()> {
        let started_at = (self.clock)();
        let (film, series) = tokio::try_join!(
            self.provider.list_genres(GenreKind::Film),
            self.provider.list_genres(GenreKind::Series),
        )?;

        let snapshot = GenreSnapshot {
            fetched_at: started_at,
            film_genres: build_mapping(film),
            series_genres: build_mapping(series),
        };

        tracing::info!(
            provider = self.provider.name(),
            film_genres = snapshot.film_genres.len(),
            series_genres = snapshot.series_genres.len(),
            "Genre snapshot refreshed"
        );

        *self.snapshot.write().await = Some(Arc::new(snapshot));
        Ok(())
    }

    /// Refreshes once on behalf of a batch of records
    ///
    /// Failures are logged here; returns whether lookups may use the snapshot.
    pub async fn refresh_for_batch(&self) -> bool {
        match self.ensure_fresh().await {
            Ok(()) => true,
            Err(e) => {
                log_resolution_failure(&e);
                false
            }
        }
    }

    /// Maps ids through the current snapshot without refreshing
    ///
    /// Unknown ids are dropped; input order is kept.
    pub async fn lookup(&self, genre_ids: &[i32], kind: GenreKind) -> Vec<String> {
        let guard = self.snapshot.read().await;
        let Some(snapshot) = guard.as_ref() else {
            return Vec::new();
        };

        let genres = snapshot.genres_for(kind);
        genre_ids
            .iter()
            .filter_map(|id| genres.get(id).cloned())
            .collect()
    }

    /// Fallible form of [`resolve_names`](Self::resolve_names)
    pub async fn try_resolve_names(
        &self,
        genre_ids: &[i32],
        media_kind: MediaKind,
    ) -> AppResult<Vec<String>> {
        let Some(kind) = media_kind.genre_kind() else {
            return Ok(Vec::new());
        };
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.ensure_fresh().await?;
        Ok(self.lookup(genre_ids, kind).await)
    }

    /// Resolves genre ids to display names
    ///
    /// Never fails: a record whose genres cannot be resolved renders without
    /// genre badges, so any refresh error degrades to an empty list.
    pub async fn resolve_names(&self, genre_ids: &[i32], media_kind: MediaKind) -> Vec<String> {
        match self.try_resolve_names(genre_ids, media_kind).await {
            Ok(names) => names,
            Err(e) => {
                log_resolution_failure(&e);
                Vec::new()
            }
        }
    }
}

/// Copy of a refresh error for callers that shared the attempt
fn replay(error: &AppError) -> AppError {
    match error {
        AppError::MissingCredential => AppError::MissingCredential,
        AppError::MalformedResponse(msg) => AppError::MalformedResponse(msg.clone()),
        AppError::ProviderUnavailable(msg) => AppError::ProviderUnavailable(msg.clone()),
        other => AppError::ProviderUnavailable(other.to_string()),
    }
}

fn log_resolution_failure(error: &AppError) {
    match error {
        AppError::MissingCredential => {
            tracing::debug!(error = %error, "Genre resolution skipped")
        }
        _ => tracing::warn!(error = %error, "Genre resolution failed"),
    }
}
