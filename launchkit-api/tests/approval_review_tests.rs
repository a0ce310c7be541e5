//! Tests for the approval review aggregation
//!
//! Covers the aggregate invariant (rejection dominates, approval
//! requires unanimity), the decide-once guard, and the notification
//! and activity side effects of a reviewer decision.

mod helpers;

use helpers::{memory_pool, seed_approval, seed_project, seed_user};
use launchkit_api::db::approvals;
use launchkit_api::review::submit_review;
use launchkit_common::db::models::{ApprovalStatus, Role};
use launchkit_common::Error;

#[tokio::test]
async fn two_reviewers_approve_then_reject() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let bob = seed_user(&pool, "bob", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice, &bob]).await;

    // First reviewer approves: request stays pending
    let outcome = submit_review(&pool, &approval, &alice, ApprovalStatus::Approved, None)
        .await
        .unwrap();
    assert_eq!(outcome.reviewer_status, ApprovalStatus::Approved);
    assert_eq!(outcome.overall_status, ApprovalStatus::Pending);
    assert!(!outcome.all_reviews_complete);

    // Second reviewer requests changes: rejection decides the request
    let outcome = submit_review(
        &pool,
        &approval,
        &bob,
        ApprovalStatus::ChangesRequested,
        Some("logo colors are off"),
    )
    .await
    .unwrap();
    assert_eq!(outcome.overall_status, ApprovalStatus::ChangesRequested);
    assert!(outcome.all_reviews_complete);

    let request = approvals::find_request(&pool, &approval).await.unwrap().unwrap();
    assert_eq!(request.status, ApprovalStatus::ChangesRequested);

    // The requester got exactly one changes-requested notification
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications
         WHERE user_id = ? AND notification_type = 'APPROVAL_CHANGES_REQUESTED'",
    )
    .bind(&requester)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn unanimous_approval_approves_request() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let bob = seed_user(&pool, "bob", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice, &bob]).await;

    submit_review(&pool, &approval, &alice, ApprovalStatus::Approved, None)
        .await
        .unwrap();
    let outcome = submit_review(&pool, &approval, &bob, ApprovalStatus::Approved, None)
        .await
        .unwrap();

    assert_eq!(outcome.overall_status, ApprovalStatus::Approved);
    assert!(outcome.all_reviews_complete);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications
         WHERE user_id = ? AND notification_type = 'APPROVAL_APPROVED'",
    )
    .bind(&requester)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn rejection_dominates_pending_reviewers() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let bob = seed_user(&pool, "bob", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice, &bob]).await;

    // One rejection settles the request even though bob never responded
    let outcome = submit_review(
        &pool,
        &approval,
        &alice,
        ApprovalStatus::ChangesRequested,
        Some("wrong font"),
    )
    .await
    .unwrap();

    assert_eq!(outcome.overall_status, ApprovalStatus::ChangesRequested);
    assert!(!outcome.all_reviews_complete);

    let request = approvals::find_request(&pool, &approval).await.unwrap().unwrap();
    assert_eq!(request.status, ApprovalStatus::ChangesRequested);
}

#[tokio::test]
async fn second_decision_is_rejected_and_first_stands() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice]).await;

    submit_review(&pool, &approval, &alice, ApprovalStatus::Approved, None)
        .await
        .unwrap();

    let err = submit_review(
        &pool,
        &approval,
        &alice,
        ApprovalStatus::ChangesRequested,
        Some("changed my mind"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);

    // First decision unchanged
    let status = approvals::reviewer_status(&pool, &approval, &alice)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status, ApprovalStatus::Approved);

    let request = approvals::find_request(&pool, &approval).await.unwrap().unwrap();
    assert_eq!(request.status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn non_reviewer_is_forbidden() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let mallory = seed_user(&pool, "mallory", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice]).await;

    let err = submit_review(&pool, &approval, &mallory, ApprovalStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)), "got {:?}", err);
}

#[tokio::test]
async fn unknown_approval_is_not_found() {
    let pool = memory_pool().await;

    let alice = seed_user(&pool, "alice", Role::Member).await;

    let err = submit_review(&pool, "no-such-id", &alice, ApprovalStatus::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn requester_reviewing_own_request_gets_no_notification() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&requester]).await;

    let outcome = submit_review(&pool, &approval, &requester, ApprovalStatus::Approved, None)
        .await
        .unwrap();
    assert_eq!(outcome.overall_status, ApprovalStatus::Approved);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
        .bind(&requester)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn every_decision_writes_one_activity_row() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let bob = seed_user(&pool, "bob", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice, &bob]).await;

    submit_review(&pool, &approval, &alice, ApprovalStatus::Approved, None)
        .await
        .unwrap();
    submit_review(&pool, &approval, &bob, ApprovalStatus::Approved, None)
        .await
        .unwrap();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM activities WHERE project_id = ? AND action = 'approval_reviewed'",
    )
    .bind(&project)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn pending_is_not_a_valid_decision() {
    let pool = memory_pool().await;

    let requester = seed_user(&pool, "requester", Role::Member).await;
    let alice = seed_user(&pool, "alice", Role::Member).await;
    let project = seed_project(&pool, "Brand X", None).await;
    let approval = seed_approval(&pool, &project, &requester, &[&alice]).await;

    let err = submit_review(&pool, &approval, &alice, ApprovalStatus::Pending, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
}
