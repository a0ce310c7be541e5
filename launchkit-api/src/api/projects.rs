//! Project CRUD handlers

use crate::api::auth::CurrentUser;
use crate::db::{activity, projects, users};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use launchkit_common::db::models::{Project, ProjectPhase};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectRequest {
    name: String,
    client_name: String,
    description: Option<String>,
    lead_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProjectRequest {
    name: Option<String>,
    phase: Option<String>,
    lead_id: Option<String>,
    description: Option<String>,
}

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(projects::list_projects(&state.db).await?))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Project>> {
    let req: CreateProjectRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed project: {}", e)))?;

    if req.name.trim().is_empty() {
        return Err(ApiError::validation("project name must not be empty"));
    }
    if req.client_name.trim().is_empty() {
        return Err(ApiError::validation("client name must not be empty"));
    }
    if let Some(lead) = &req.lead_id {
        if !users::user_exists(&state.db, lead).await? {
            return Err(ApiError::validation(format!("unknown lead user: {}", lead)));
        }
    }

    let guid = Uuid::new_v4().to_string();
    projects::insert_project(
        &state.db,
        &guid,
        req.name.trim(),
        req.client_name.trim(),
        ProjectPhase::Discovery,
        req.lead_id.as_deref(),
        req.description.as_deref(),
    )
    .await?;

    activity::record(
        &state.db,
        &guid,
        &user.guid,
        "project_created",
        &format!("created project {}", req.name.trim()),
        json!({ "clientName": req.client_name.trim() }),
    )
    .await?;

    let project = projects::find_project(&state.db, &guid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {}", guid)))?;

    Ok(Json(project))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let project = projects::find_project(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {}", id)))?;

    Ok(Json(project))
}

/// PATCH /api/projects/:id
///
/// Partial update; absent fields keep their current value.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Project>> {
    let req: UpdateProjectRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed update: {}", e)))?;

    let current = projects::find_project(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {}", id)))?;

    let phase = match &req.phase {
        Some(raw) => ProjectPhase::parse(raw)
            .ok_or_else(|| ApiError::validation(format!("unknown phase: {}", raw)))?,
        None => current.phase,
    };

    if let Some(lead) = &req.lead_id {
        if !users::user_exists(&state.db, lead).await? {
            return Err(ApiError::validation(format!("unknown lead user: {}", lead)));
        }
    }

    let name = req.name.as_deref().unwrap_or(&current.name);
    if name.trim().is_empty() {
        return Err(ApiError::validation("project name must not be empty"));
    }

    let lead = req.lead_id.as_deref().or(current.lead_user_id.as_deref());
    let description = req.description.as_deref().or(current.description.as_deref());

    projects::update_project(&state.db, &id, name.trim(), phase, lead, description).await?;

    let action = if phase != current.phase {
        "project_status_changed"
    } else {
        "project_updated"
    };
    activity::record(
        &state.db,
        &id,
        &user.guid,
        action,
        &format!("updated project {}", name.trim()),
        json!({ "from": current.phase, "to": phase }),
    )
    .await?;

    let project = projects::find_project(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {}", id)))?;

    Ok(Json(project))
}
