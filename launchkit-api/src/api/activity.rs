//! Project activity feed (paginated)

use crate::db::{activity, projects};
use crate::error::{ApiError, ApiResult};
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use launchkit_common::db::models::Activity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPage {
    pub project_id: String,
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub entries: Vec<Activity>,
}

/// GET /api/projects/:id/activity
pub async fn project_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<ActivityPage>> {
    projects::find_project(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {}", id)))?;

    let total = activity::count_for_project(&state.db, &id).await?;
    let pagination = calculate_pagination(total, query.page);

    let entries =
        activity::list_for_project(&state.db, &id, PAGE_SIZE, pagination.offset).await?;

    Ok(Json(ActivityPage {
        project_id: id,
        total_results: total,
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        entries,
    }))
}
