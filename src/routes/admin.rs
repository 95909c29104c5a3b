use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{AdminAuth, AdminSession, RequestId},
    models::{ContentView, MediaKind, NewContent},
    routes::AppState,
    services::{
        catalog,
        form_fields::{ListField, NumberField},
    },
};

/// Highest personal rating the form accepts
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub is_admin: bool,
}

/// Admin form for creating or replacing a content record
///
/// Usually prefilled from a TMDB search hit. List fields take either a JSON
/// array or comma-separated text; numeric fields take numbers or text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentForm {
    pub tmdb_id: String,
    pub title: String,
    pub name: String,
    pub overview: String,
    pub release_date: String,
    pub first_air_date: String,
    pub poster_path: String,
    pub poster_url: String,
    pub backdrop_path: String,
    pub genre_ids: ListField,
    pub popularity: Option<NumberField>,
    pub vote_average: Option<NumberField>,
    pub vote_count: Option<NumberField>,
    pub adult: Option<bool>,
    #[serde(alias = "type")]
    pub media_type: MediaKind,
    pub year: String,
    pub my_note: String,
    pub my_rating: Option<NumberField>,
    pub tags: ListField,
}

impl ContentForm {
    /// Checks required fields and normalizes the rest
    pub fn validate(self) -> AppResult<NewContent> {
        let tmdb_id = self.tmdb_id.trim().to_string();
        let title = self.title.trim().to_string();
        let my_note = self.my_note.trim().to_string();
        let my_rating = self.my_rating.as_ref().and_then(NumberField::as_f64);

        let mut missing = Vec::new();
        if tmdb_id.is_empty() {
            missing.push("tmdb_id");
        }
        if title.is_empty() {
            missing.push("title");
        }
        if my_note.is_empty() {
            missing.push("my_note");
        }
        if my_rating.is_none() {
            missing.push("my_rating");
        }
        let Some(my_rating) = my_rating.filter(|_| missing.is_empty()) else {
            return Err(AppError::InvalidInput(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        };

        if !(0.0..=MAX_RATING).contains(&my_rating) {
            return Err(AppError::InvalidInput(format!(
                "my_rating must be between 0 and {}",
                MAX_RATING
            )));
        }

        let mut year = self.year.trim().to_string();
        if year.is_empty() {
            year = [&self.release_date, &self.first_air_date]
                .into_iter()
                .filter_map(|d| d.get(..4))
                .find(|y| y.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or_default()
                .to_string();
        }

        Ok(NewContent {
            tmdb_id,
            title,
            name: self.name.trim().to_string(),
            overview: self.overview,
            release_date: self.release_date,
            first_air_date: self.first_air_date,
            poster_path: self.poster_path,
            poster_url: self.poster_url,
            backdrop_path: self.backdrop_path,
            genre_ids: self.genre_ids.genre_ids(),
            popularity: self.popularity.as_ref().and_then(NumberField::as_f64),
            vote_average: self.vote_average.as_ref().and_then(NumberField::as_f64),
            vote_count: self
                .vote_count
                .as_ref()
                .and_then(NumberField::as_f64)
                .map(|n| n.round() as i64),
            adult: self.adult,
            media_type: self.media_type,
            year,
            my_note,
            my_rating,
            tags: self.tags.tags(),
        })
    }
}

/// Handler for admin login
pub async fn login(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if let Err(e) = state.admin.login(&request.password) {
        tracing::warn!(request_id = %request_id, error = %e, "Admin login rejected");
        return Err(e);
    }

    tracing::info!(request_id = %request_id, "Admin logged in");

    Ok((
        [(header::SET_COOKIE, state.admin.session_cookie())],
        Json(SessionResponse { is_admin: true }),
    ))
}

/// Handler for admin logout
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, AdminAuth::clear_cookie())],
        Json(SessionResponse { is_admin: false }),
    )
}

/// Reports whether the caller holds an admin session
pub async fn session(Extension(session): Extension<AdminSession>) -> Json<SessionResponse> {
    Json(SessionResponse {
        is_admin: session.is_admin,
    })
}

/// Handler for creating a content record
pub async fn create_content(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(form): Json<ContentForm>,
) -> AppResult<(StatusCode, Json<ContentView>)> {
    let input = form.validate()?;
    let content = state.store.create_content(input).await?;

    tracing::info!(
        request_id = %request_id,
        content_id = %content.id,
        tmdb_id = %content.tmdb_id,
        "Content created"
    );

    let view = catalog::annotate_one(content, &state.genres).await;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Handler for replacing a content record
pub async fn update_content(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(form): Json<ContentForm>,
) -> AppResult<Json<ContentView>> {
    let input = form.validate()?;
    let content = state
        .store
        .update_content(id, input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {} not found", id)))?;

    tracing::info!(request_id = %request_id, content_id = %id, "Content updated");

    Ok(Json(catalog::annotate_one(content, &state.genres).await))
}

/// Handler for deleting a content record and its comments
pub async fn delete_content(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.store.delete_content(id).await? {
        return Err(AppError::NotFound(format!("Content {} not found", id)));
    }

    tracing::info!(request_id = %request_id, content_id = %id, "Content deleted");
    Ok(StatusCode::NO_CONTENT)
}
