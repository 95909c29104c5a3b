use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Comment, NewComment},
    routes::AppState,
};

/// Handler for anonymous comment posting
pub async fn create(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(content_id): Path<Uuid>,
    Json(input): Json<NewComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let input = input.validate().ok_or_else(|| {
        AppError::InvalidInput("Both nickname and text are required".to_string())
    })?;

    if state.store.get_content(content_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Content {} not found",
            content_id
        )));
    }

    let comment = state.store.create_comment(content_id, input).await?;

    tracing::info!(
        request_id = %request_id,
        content_id = %content_id,
        comment_id = %comment.id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(comment)))
}
