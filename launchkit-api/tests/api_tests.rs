//! Integration tests for the HTTP API
//!
//! Drives the real router with tower's `oneshot`: authentication,
//! the review endpoint contract, bulk validation, notification
//! ownership, and activity pagination.

mod helpers;

use axum::http::StatusCode;
use helpers::{
    json_request, login, memory_pool, read_json, router, seed_approval, seed_project, seed_user,
};
use launchkit_api::db::approvals;
use launchkit_common::db::models::{ApprovalStatus, Role};
use serde_json::json;
use tower::util::ServiceExt;

#[tokio::test]
async fn health_needs_no_auth() {
    let pool = memory_pool().await;
    let app = router(pool);

    let response = app
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "launchkit-api");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let pool = memory_pool().await;
    let app = router(pool);

    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/projects", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(json_request("GET", "/api/projects", Some("bogus-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_and_me_round_trip() {
    let pool = memory_pool().await;
    seed_user(&pool, "alice", Role::Member).await;
    let app = router(pool);

    let token = login(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "MEMBER");
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let pool = memory_pool().await;
    seed_user(&pool, "alice", Role::Member).await;
    let app = router(pool);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn review_endpoint_full_flow() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let bob = seed_user(&pool, "bob", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice, &bob]).await;

    let app = router(pool.clone());
    let alice_token = login(&app, "alice").await;
    let bob_token = login(&app, "bob").await;

    // Alice approves: overall stays pending
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/approvals/{}/review", approval),
            Some(&alice_token),
            Some(json!({ "reviewerId": alice, "status": "APPROVED" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["reviewerStatus"], "APPROVED");
    assert_eq!(body["overallStatus"], "PENDING");
    assert_eq!(body["allReviewsComplete"], false);

    // Bob requests changes: rejection decides the request
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/approvals/{}/review", approval),
            Some(&bob_token),
            Some(json!({
                "reviewerId": bob,
                "status": "CHANGES_REQUESTED",
                "feedbackText": "palette clashes with the brief",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["overallStatus"], "CHANGES_REQUESTED");
    assert_eq!(body["allReviewsComplete"], true);
}

#[tokio::test]
async fn review_rejects_mismatched_reviewer_id() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let bob = seed_user(&pool, "bob", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice, &bob]).await;

    let app = router(pool);
    let alice_token = login(&app, "alice").await;

    // Alice cannot submit under bob's reviewer id
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/approvals/{}/review", approval),
            Some(&alice_token),
            Some(json!({ "reviewerId": bob, "status": "APPROVED" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn review_twice_is_a_bad_request() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice]).await;

    let app = router(pool);
    let token = login(&app, "alice").await;

    let request = || {
        json_request(
            "PATCH",
            &format!("/api/approvals/{}/review", approval),
            Some(&token),
            Some(json!({ "reviewerId": alice, "status": "APPROVED" })),
        )
    };

    let response = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("already submitted"));
}

#[tokio::test]
async fn review_unknown_approval_is_not_found() {
    let pool = memory_pool().await;

    let alice = seed_user(&pool, "alice", Role::Member).await;
    let app = router(pool);
    let token = login(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/api/approvals/no-such-approval/review",
            Some(&token),
            Some(json!({ "reviewerId": alice, "status": "APPROVED" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_reject_without_feedback_mutates_nothing() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice]).await;

    let app = router(pool.clone());
    let token = login(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bulk/approvals",
            Some(&token),
            Some(json!({ "operation": "reject", "approvalIds": [approval] })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Rejected before any mutation: the reviewer row is still pending
    let status = approvals::reviewer_status(&pool, &approval, &alice)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status, ApprovalStatus::Pending);
}

#[tokio::test]
async fn bulk_approve_reports_updated_count() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let bob = seed_user(&pool, "bob", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;

    let a1 = seed_approval(&pool, &project, &requester, &[&alice]).await;
    let a2 = seed_approval(&pool, &project, &requester, &[&bob]).await;

    let app = router(pool);
    let token = login(&app, "alice").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bulk/approvals",
            Some(&token),
            Some(json!({ "operation": "approve", "approvalIds": [a1, a2] })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["updatedCount"], 1);
}

#[tokio::test]
async fn bulk_projects_require_admin_role() {
    let pool = memory_pool().await;

    seed_user(&pool, "member", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;

    let app = router(pool);
    let token = login(&app, "member").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bulk/projects",
            Some(&token),
            Some(json!({
                "operation": "updateStatus",
                "projectIds": [project],
                "data": { "status": "LAUNCH" },
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bulk_projects_update_status_end_to_end() {
    let pool = memory_pool().await;

    seed_user(&pool, "boss", Role::Admin).await;
    let p1 = seed_project(&pool, "One", None).await;
    let p2 = seed_project(&pool, "Two", None).await;
    let p3 = seed_project(&pool, "Three", None).await;

    let app = router(pool.clone());
    let token = login(&app, "boss").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bulk/projects",
            Some(&token),
            Some(json!({
                "operation": "updateStatus",
                "projectIds": [p1, p2, p3],
                "data": { "status": "LAUNCH" },
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["updatedCount"], 3);

    let launched: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE phase = 'LAUNCH'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(launched, 3);
}

#[tokio::test]
async fn notifications_are_recipient_only() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    seed_user(&pool, "mallory", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice]).await;

    let app = router(pool.clone());
    let alice_token = login(&app, "alice").await;
    let mallory_token = login(&app, "mallory").await;

    // Alice rejects; the requester gets a notification
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/approvals/{}/review", approval),
            Some(&alice_token),
            Some(json!({
                "reviewerId": alice,
                "status": "CHANGES_REQUESTED",
                "feedbackText": "redo the moodboard",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let guid: String = sqlx::query_scalar("SELECT guid FROM notifications WHERE user_id = ?")
        .bind(&requester)
        .fetch_one(&pool)
        .await
        .unwrap();

    // Mallory cannot mark someone else's notification read
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/notifications/{}/read", guid),
            Some(&mallory_token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn activity_pagination_clamps_page() {
    let pool = memory_pool().await;

    let admin = seed_user(&pool, "boss", Role::Admin).await;
    let project = seed_project(&pool, "Brand X", None).await;

    for i in 0..3 {
        launchkit_api::db::activity::record(
            &pool,
            &project,
            &admin,
            "project_updated",
            &format!("edit {}", i),
            serde_json::json!({}),
        )
        .await
        .unwrap();
    }

    let app = router(pool);
    let token = login(&app, "boss").await;

    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/projects/{}/activity?page=99", project),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["totalResults"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["entries"].as_array().unwrap().len(), 3);
}
