//! HTTP API for the corkboard server.
//!
//! Stateless JSON handlers over the database layer; no business logic
//! beyond validation and row/JSON translation.

pub mod auth;
pub mod boards;
pub mod columns;
pub mod search;
pub mod tasks;
pub mod users;

use axum::Router;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::Database;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Arc<Database>,
}

impl ApiContext {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the API router.
pub fn router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/boards", get(boards::list).post(boards::create))
        .route(
            "/api/boards/{id}",
            put(boards::rename).delete(boards::delete),
        )
        .route("/api/boards/{id}/share", post(boards::share))
        .route("/api/boards/{id}/columns", get(columns::list))
        .route("/api/boards/{id}/tasks", get(tasks::list))
        .route("/api/columns", post(columns::create))
        .route(
            "/api/columns/{id}",
            put(columns::rename).delete(columns::delete),
        )
        .route("/api/tasks", post(tasks::create))
        .route("/api/tasks/{id}", put(tasks::update).delete(tasks::delete))
        .route("/api/tasks/{id}/reorder", post(tasks::reorder))
        .route("/api/tasks/{id}/attachments", post(tasks::add_attachment))
        .route("/api/search", get(search::search))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users", get(users::list))
        .route("/api/users/lookup", get(users::lookup))
        .route("/api/users/{id}", put(users::update))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
