//! launchkit-api library - HTTP API service for LaunchKit
//!
//! Exposes the axum router and application state so integration tests
//! can drive the service without binding a socket.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod bulk;
pub mod db;
pub mod error;
pub mod pagination;
pub mod review;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Everything under /api except login requires a session; /health and
/// /api/auth/login are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, patch, post};
    use tower_http::cors::CorsLayer;

    // Protected routes (require a valid session token)
    let protected = Router::new()
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/me", get(api::auth::me))
        .route("/api/users", get(api::users::list_users).post(api::users::create_user))
        .route("/api/projects", get(api::projects::list_projects).post(api::projects::create_project))
        .route("/api/projects/:id", get(api::projects::get_project).patch(api::projects::update_project))
        .route("/api/projects/:id/activity", get(api::activity::project_activity))
        .route("/api/approvals", post(api::approvals::create_approval))
        .route("/api/approvals/:id", get(api::approvals::get_approval))
        .route("/api/approvals/:id/review", patch(api::approvals::review_approval))
        .route("/api/bulk/approvals", post(api::bulk::bulk_approvals))
        .route("/api/bulk/projects", post(api::bulk::bulk_projects))
        .route("/api/notifications", get(api::notifications::list_notifications))
        .route("/api/notifications/read-all", patch(api::notifications::mark_all_read))
        .route("/api/notifications/:id/read", patch(api::notifications::mark_read))
        .route("/api/notifications/:id", delete(api::notifications::delete_notification))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/health", get(api::health::health_check))
        .route("/api/auth/login", post(api::auth::login));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
