use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{AdminSession, RequestId},
    models::{Comment, ContentView},
    routes::AppState,
    services::catalog::{self, CatalogQuery},
};

#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub contents: Vec<ContentView>,
    pub total: usize,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct ContentDetailResponse {
    pub content: ContentView,
    pub comments: Vec<Comment>,
    pub is_admin: bool,
}

/// Handler for the catalog listing
pub async fn list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(session): Extension<AdminSession>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ContentListResponse>> {
    let contents = state.store.list_contents().await?;
    let contents = catalog::filter_and_sort(contents, &query);
    let contents = catalog::annotate(contents, &state.genres).await;

    tracing::debug!(
        request_id = %request_id,
        results = contents.len(),
        sort = ?query.sort,
        "Catalog listed"
    );

    Ok(Json(ContentListResponse {
        total: contents.len(),
        contents,
        is_admin: session.is_admin,
    }))
}

/// Handler for a single record with its comments
pub async fn detail(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContentDetailResponse>> {
    let content = state
        .store
        .get_content(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {} not found", id)))?;

    let comments = state.store.list_comments(id).await?;
    let content = catalog::annotate_one(content, &state.genres).await;

    Ok(Json(ContentDetailResponse {
        content,
        comments,
        is_admin: session.is_admin,
    }))
}
