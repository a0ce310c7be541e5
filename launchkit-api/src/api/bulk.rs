//! Bulk operation handlers
//!
//! Batch-level validation lives here and runs before the first
//! mutation; per-item skips are handled by the dispatcher in bulk.rs.

use crate::api::auth::CurrentUser;
use crate::bulk::{
    run_approval_operation, run_project_operation, ApprovalOperation, ProjectOperation,
    ProjectOperationData,
};
use crate::db::users;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{extract::State, Extension, Json};
use launchkit_common::db::models::{ProjectPhase, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkApprovalsRequest {
    operation: String,
    approval_ids: Vec<String>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkProjectsRequest {
    operation: String,
    project_ids: Vec<String>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResponse {
    pub success: bool,
    pub updated_count: u64,
    pub message: String,
}

fn data_str(data: &Option<Value>, key: &str) -> Option<String> {
    data.as_ref()
        .and_then(|d| d.get(key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// POST /api/bulk/approvals
pub async fn bulk_approvals(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> ApiResult<Json<BulkResponse>> {
    let req: BulkApprovalsRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed bulk request: {}", e)))?;

    let operation = ApprovalOperation::parse(&req.operation)
        .ok_or_else(|| ApiError::validation(format!("unknown operation: {}", req.operation)))?;

    if req.approval_ids.is_empty() {
        return Err(ApiError::validation("approvalIds must not be empty"));
    }

    // The same feedback applies to every target; required for reject
    let feedback = data_str(&req.data, "feedback");
    if operation == ApprovalOperation::Reject
        && feedback.as_deref().map_or(true, |f| f.trim().is_empty())
    {
        return Err(ApiError::validation(
            "feedback is required when rejecting approvals",
        ));
    }

    let updated = run_approval_operation(
        &state.db,
        &user.guid,
        operation,
        &req.approval_ids,
        feedback.as_deref(),
    )
    .await?;

    Ok(Json(BulkResponse {
        success: true,
        updated_count: updated,
        message: format!("Updated {} of {} approvals", updated, req.approval_ids.len()),
    }))
}

/// POST /api/bulk/projects
pub async fn bulk_projects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> ApiResult<Json<BulkResponse>> {
    if user.role != Role::Admin {
        return Err(ApiError::forbidden(
            "administrator role required for bulk project operations",
        ));
    }

    let req: BulkProjectsRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed bulk request: {}", e)))?;

    let operation = ProjectOperation::parse(&req.operation)
        .ok_or_else(|| ApiError::validation(format!("unknown operation: {}", req.operation)))?;

    if req.project_ids.is_empty() {
        return Err(ApiError::validation("projectIds must not be empty"));
    }

    let data = match operation {
        ProjectOperation::UpdateStatus => {
            let raw = data_str(&req.data, "status")
                .ok_or_else(|| ApiError::validation("updateStatus requires data.status"))?;
            let phase = ProjectPhase::parse(&raw)
                .ok_or_else(|| ApiError::validation(format!("unknown phase: {}", raw)))?;
            ProjectOperationData::UpdateStatus { phase }
        }
        ProjectOperation::AssignLead => {
            let lead = data_str(&req.data, "leadId")
                .ok_or_else(|| ApiError::validation("assignLead requires data.leadId"))?;
            if !users::user_exists(&state.db, &lead).await? {
                return Err(ApiError::validation(format!("unknown user: {}", lead)));
            }
            ProjectOperationData::AssignLead { lead_user_id: lead }
        }
        ProjectOperation::Delete => ProjectOperationData::Delete,
    };

    let updated = run_project_operation(&state.db, &user.guid, &req.project_ids, &data).await?;

    let verb = match operation {
        ProjectOperation::Delete => "Deleted",
        _ => "Updated",
    };

    Ok(Json(BulkResponse {
        success: true,
        updated_count: updated,
        message: format!("{} {} of {} projects", verb, updated, req.project_ids.len()),
    }))
}
