use crate::{
    error::{AppError, AppResult},
    models::SearchResult,
    services::providers::MetadataProvider,
};
use std::sync::Arc;

/// Service function for title search
///
/// Delegates to the configured MetadataProvider. Provider errors are passed
/// through unchanged so the caller can tell a missing credential apart from
/// a rejected request.
pub async fn search_titles(
    provider: Arc<dyn MetadataProvider>,
    query: &str,
) -> AppResult<Vec<SearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter 'q' is required".to_string(),
        ));
    }

    provider.search(query).await.inspect_err(|e| {
        tracing::error!(
            provider = provider.name(),
            query = %query,
            error = %e,
            "Title search failed"
        );
    })
}
