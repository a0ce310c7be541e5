//! Shared test helpers: in-memory database setup, seeded entities, and
//! request plumbing for router-level tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use launchkit_api::db::{approvals, projects, users};
use launchkit_api::{build_router, AppState};
use launchkit_common::auth::{generate_salt, hash_password};
use launchkit_common::db::init::create_schema;
use launchkit_common::db::models::{ProjectPhase, Role};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::util::ServiceExt;
use uuid::Uuid;

/// Password used for every seeded test user
pub const TEST_PASSWORD: &str = "password123";

/// Fresh in-memory database with the full schema.
///
/// One connection only: each pooled connection would otherwise get its
/// own empty in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();

    create_schema(&pool).await.unwrap();
    pool
}

pub fn router(pool: SqlitePool) -> Router {
    build_router(AppState::new(pool))
}

pub async fn seed_user(pool: &SqlitePool, username: &str, role: Role) -> String {
    let guid = Uuid::new_v4().to_string();
    let salt = generate_salt();
    let hash = hash_password(TEST_PASSWORD, &salt);

    users::insert_user(pool, &guid, username, &hash, &salt, username, role)
        .await
        .unwrap();

    guid
}

pub async fn seed_project(pool: &SqlitePool, name: &str, lead: Option<&str>) -> String {
    let guid = Uuid::new_v4().to_string();

    projects::insert_project(
        pool,
        &guid,
        name,
        "Acme Creators",
        ProjectPhase::Discovery,
        lead,
        None,
    )
    .await
    .unwrap();

    guid
}

pub async fn seed_approval(
    pool: &SqlitePool,
    project_id: &str,
    requester_id: &str,
    reviewer_ids: &[&str],
) -> String {
    let guid = Uuid::new_v4().to_string();

    approvals::insert_request(pool, &guid, project_id, requester_id, "please review", None)
        .await
        .unwrap();

    for reviewer in reviewer_ids {
        approvals::insert_reviewer(pool, &guid, reviewer).await.unwrap();
    }

    guid
}

/// Build a JSON request, optionally authenticated
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Log a seeded user in through the real endpoint and return the token
pub async fn login(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({
                "username": username,
                "password": TEST_PASSWORD,
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let body = read_json(response).await;
    body["token"].as_str().unwrap().to_string()
}
