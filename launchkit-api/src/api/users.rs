//! User management handlers

use crate::api::auth::CurrentUser;
use crate::db::users;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{extract::State, Extension, Json};
use launchkit_common::auth::{generate_salt, hash_password};
use launchkit_common::db::models::{Role, User};
use launchkit_common::Error;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    username: String,
    password: String,
    display_name: Option<String>,
    role: Option<String>,
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(users::list_users(&state.db).await?))
}

/// POST /api/users (ADMIN only)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Value>,
) -> ApiResult<Json<User>> {
    if user.role != Role::Admin {
        return Err(ApiError::forbidden("administrator role required"));
    }

    let req: CreateUserRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed user: {}", e)))?;

    let username = req.username.trim();
    if username.is_empty() {
        return Err(ApiError::validation("username must not be empty"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::validation("password must be at least 8 characters"));
    }

    let role = match &req.role {
        Some(raw) => Role::parse(raw)
            .ok_or_else(|| ApiError::validation(format!("unknown role: {}", raw)))?,
        None => Role::Member,
    };

    if users::username_taken(&state.db, username).await? {
        return Err(ApiError(Error::Conflict(format!(
            "username already taken: {}",
            username
        ))));
    }

    let guid = Uuid::new_v4().to_string();
    let salt = generate_salt();
    let hash = hash_password(&req.password, &salt);
    let display_name = req.display_name.as_deref().unwrap_or(username);

    users::insert_user(&state.db, &guid, username, &hash, &salt, display_name, role).await?;

    let created = users::find_user(&state.db, &guid)
        .await?
        .ok_or_else(|| ApiError(Error::Internal("user vanished after insert".into())))?;

    Ok(Json(created))
}
