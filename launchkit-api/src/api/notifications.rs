//! Notification inbox handlers
//!
//! Notifications are created by the review/bulk/approval flows; these
//! endpoints let the recipient read and clear their own inbox.

use crate::api::auth::CurrentUser;
use crate::db::notifications;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use launchkit_common::db::models::Notification;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// When true, only unread notifications are returned
    #[serde(default)]
    pub unread: bool,
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let items = notifications::list_for_user(&state.db, &user.guid, query.unread).await?;
    Ok(Json(items))
}

/// PATCH /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let notification = notifications::find(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("notification {}", id)))?;

    if notification.user_id != user.guid {
        return Err(ApiError::forbidden(
            "notifications can only be modified by their recipient",
        ));
    }

    notifications::mark_read(&state.db, &id).await?;
    Ok(Json(json!({ "success": true })))
}

/// PATCH /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    let updated = notifications::mark_all_read(&state.db, &user.guid).await?;
    Ok(Json(json!({ "success": true, "updatedCount": updated })))
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let notification = notifications::find(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("notification {}", id)))?;

    if notification.user_id != user.guid {
        return Err(ApiError::forbidden(
            "notifications can only be deleted by their recipient",
        ));
    }

    notifications::delete(&state.db, &id).await?;
    Ok(Json(json!({ "success": true })))
}
