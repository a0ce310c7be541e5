//! Session authentication: login/logout handlers and the middleware
//! that resolves a bearer token to the current user.

use crate::db::{sessions, users};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use launchkit_common::auth::verify_password;
use launchkit_common::db::models::{Role, User};
use launchkit_common::db::setting_i64;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Fallback session lifetime when the setting is missing (30 days)
const DEFAULT_SESSION_TTL: i64 = 2_592_000;

/// Authenticated user, inserted into request extensions by the middleware
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub guid: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        CurrentUser {
            guid: user.guid,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
        }
    }
}

/// Session token of the current request, kept for logout
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(s) = value.to_str() {
            if let Some(token) = s.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    headers
        .get("x-session-token")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Authentication middleware for protected routes
///
/// Resolves the bearer token to a user and stores CurrentUser (and the
/// token itself) in request extensions. Returns 401 when the token is
/// missing, unknown, or expired.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("missing session token"))?;

    let user = sessions::find_session_user(&state.db, &token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid or expired session"))?;

    request.extensions_mut().insert(CurrentUser::from(user));
    request.extensions_mut().insert(SessionToken(token));

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let req: LoginRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("malformed login request: {}", e)))?;

    let auth_user = users::find_auth_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid username or password"))?;

    if !verify_password(&req.password, &auth_user.password_salt, &auth_user.password_hash) {
        return Err(ApiError::unauthorized("invalid username or password"));
    }

    let ttl = setting_i64(&state.db, "session_timeout_seconds", DEFAULT_SESSION_TTL).await?;
    let token = sessions::create_session(&state.db, &auth_user.guid, ttl).await?;

    let user = users::find_user(&state.db, &auth_user.guid)
        .await?
        .ok_or_else(|| {
            ApiError(launchkit_common::Error::Internal("user vanished during login".into()))
        })?;

    info!("User {} logged in", user.username);

    Ok(Json(json!({
        "token": token,
        "user": user,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<Json<Value>> {
    sessions::delete_session(&state.db, &token.0).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/auth/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(user)
}
