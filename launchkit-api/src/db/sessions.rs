//! Session database operations
//!
//! Sessions carry an opaque token and an absolute expiry (unix
//! seconds). Expired rows are ignored on lookup and cleaned up
//! opportunistically on login.

use launchkit_common::auth::generate_token;
use launchkit_common::db::models::{Role, User};
use launchkit_common::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Create a session for the user and return its token
pub async fn create_session(pool: &SqlitePool, user_guid: &str, ttl_seconds: i64) -> Result<String> {
    let token = generate_token();
    let expires_at = chrono::Utc::now().timestamp() + ttl_seconds;

    sqlx::query("INSERT INTO sessions (token, user_guid, expires_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_guid)
        .bind(expires_at)
        .execute(pool)
        .await?;

    // Drop this user's expired sessions while we are here
    sqlx::query("DELETE FROM sessions WHERE user_guid = ? AND expires_at <= ?")
        .bind(user_guid)
        .bind(chrono::Utc::now().timestamp())
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolve a token to its user, ignoring expired sessions
pub async fn find_session_user(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let now = chrono::Utc::now().timestamp();

    let row = sqlx::query(
        r#"
        SELECT u.guid, u.username, u.display_name, u.role, u.created_at
        FROM sessions s
        JOIN users u ON u.guid = s.user_guid
        WHERE s.token = ? AND s.expires_at > ?
        "#,
    )
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let role: String = row.get("role");
            let role = Role::parse(&role)
                .ok_or_else(|| Error::Internal(format!("invalid role in users table: {}", role)))?;
            Ok(Some(User {
                guid: row.get("guid"),
                username: row.get("username"),
                display_name: row.get("display_name"),
                role,
                created_at: row.get("created_at"),
            }))
        }
        None => Ok(None),
    }
}

/// Delete a session (logout)
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
