//! Approval request handlers: create, fetch, and the single-reviewer
//! review endpoint.

use crate::api::auth::CurrentUser;
use crate::db::{activity, approvals, notifications, projects, users};
use crate::error::{ApiError, ApiResult};
use crate::review;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use launchkit_common::db::models::{
    ApprovalRequest, ApprovalReviewer, ApprovalStatus, NotificationType,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateApprovalRequest {
    project_id: String,
    message: String,
    due_date: Option<String>,
    reviewer_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest {
    reviewer_id: String,
    status: String,
    feedback_text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDetail {
    pub approval: ApprovalRequest,
    pub reviewers: Vec<ApprovalReviewer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub reviewer_status: ApprovalStatus,
    pub overall_status: ApprovalStatus,
    pub all_reviews_complete: bool,
}

/// POST /api/approvals
///
/// Creates the request plus one PENDING reviewer row per designated
/// reviewer, notifies the reviewers, and logs the activity, all in one
/// transaction.
pub async fn create_approval(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ApprovalDetail>> {
    let req: CreateApprovalRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed approval request: {}", e)))?;

    if req.message.trim().is_empty() {
        return Err(ApiError::validation("message must not be empty"));
    }

    let mut reviewer_ids = req.reviewer_ids.clone();
    reviewer_ids.sort();
    reviewer_ids.dedup();
    if reviewer_ids.is_empty() {
        return Err(ApiError::validation("at least one reviewer is required"));
    }

    projects::find_project(&state.db, &req.project_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {}", req.project_id)))?;

    for reviewer in &reviewer_ids {
        if !users::user_exists(&state.db, reviewer).await? {
            return Err(ApiError::validation(format!("unknown reviewer: {}", reviewer)));
        }
    }

    let guid = Uuid::new_v4().to_string();
    let mut tx = state.db.begin().await.map_err(launchkit_common::Error::from)?;

    approvals::insert_request(
        &mut *tx,
        &guid,
        &req.project_id,
        &user.guid,
        req.message.trim(),
        req.due_date.as_deref(),
    )
    .await?;

    for reviewer in &reviewer_ids {
        approvals::insert_reviewer(&mut *tx, &guid, reviewer).await?;
    }

    activity::record(
        &mut *tx,
        &req.project_id,
        &user.guid,
        "approval_requested",
        "requested sign-off",
        json!({ "approvalId": guid, "reviewerCount": reviewer_ids.len() }),
    )
    .await?;

    let notification = notifications::NewNotification {
        notification_type: NotificationType::ApprovalRequested,
        title: "Approval requested".to_string(),
        message: format!("{} requested your review", user.display_name),
        action_url: Some(format!("/projects/{}/approvals/{}", req.project_id, guid)),
        project_id: Some(req.project_id.clone()),
        approval_id: Some(guid.clone()),
        triggered_by: Some(user.guid.clone()),
    };
    // Requesters reviewing their own request get no notification
    let recipients: Vec<String> = reviewer_ids
        .iter()
        .filter(|r| **r != user.guid)
        .cloned()
        .collect();
    notifications::notify(&mut tx, &recipients, &notification).await?;

    tx.commit().await.map_err(launchkit_common::Error::from)?;

    get_detail(&state, &guid).await.map(Json)
}

/// GET /api/approvals/:id
pub async fn get_approval(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApprovalDetail>> {
    get_detail(&state, &id).await.map(Json)
}

async fn get_detail(state: &AppState, id: &str) -> ApiResult<ApprovalDetail> {
    let approval = approvals::find_request(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("approval request {}", id)))?;

    let reviewers = approvals::list_reviewers(&state.db, id).await?;

    Ok(ApprovalDetail {
        approval,
        reviewers,
    })
}

/// PATCH /api/approvals/:id/review
///
/// Records the authenticated reviewer's decision and returns the
/// recomputed overall status.
pub async fn review_approval(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ReviewResponse>> {
    let req: ReviewRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed review: {}", e)))?;

    if req.reviewer_id != user.guid {
        return Err(ApiError::forbidden(
            "reviewerId does not match the authenticated user",
        ));
    }

    let decision = match ApprovalStatus::parse(&req.status) {
        Some(s @ (ApprovalStatus::Approved | ApprovalStatus::ChangesRequested)) => s,
        _ => {
            return Err(ApiError::validation(
                "status must be APPROVED or CHANGES_REQUESTED",
            ))
        }
    };

    let outcome = review::submit_review(
        &state.db,
        &id,
        &user.guid,
        decision,
        req.feedback_text.as_deref(),
    )
    .await?;

    Ok(Json(ReviewResponse {
        reviewer_status: outcome.reviewer_status,
        overall_status: outcome.overall_status,
        all_reviews_complete: outcome.all_reviews_complete,
    }))
}
