use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::CatalogStore,
    middleware::{
        admin_session, make_span_with_request_id, request_id_middleware, require_admin, AdminAuth,
    },
    services::{GenreResolver, MetadataProvider},
};

pub mod admin;
pub mod comments;
pub mod contents;
pub mod search;

/// Shared application state, constructed once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub provider: Arc<dyn MetadataProvider>,
    pub genres: Arc<GenreResolver>,
    pub admin: AdminAuth,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state.clone(), admin_session))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(state: AppState) -> Router<AppState> {
    let admin_only = Router::new()
        .route("/tmdb/search", get(search::search))
        .route("/admin/contents", post(admin::create_content))
        .route(
            "/admin/contents/:id",
            put(admin::update_content).delete(admin::delete_content),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/contents", get(contents::list))
        .route("/contents/:id", get(contents::detail))
        .route("/contents/:id/comments", post(comments::create))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/session", get(admin::session))
        .merge(admin_only)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
