use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult, middleware::RequestId, models::SearchResult, routes::AppState,
    services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Handler for the admin-only TMDB search proxy
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchResult>>> {
    tracing::info!(request_id = %request_id, query = %params.q, "Processing title search");

    let results = title_search::search_titles(state.provider.clone(), &params.q).await?;
    Ok(Json(results))
}
