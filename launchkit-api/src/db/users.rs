//! User database operations

use launchkit_common::db::models::{Role, User};
use launchkit_common::{Error, Result};
use sqlx::{Executor, Row, Sqlite};

/// User row including credentials; never serialized
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub guid: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub password_hash: String,
    pub password_salt: String,
}

fn parse_role(value: &str) -> Result<Role> {
    Role::parse(value).ok_or_else(|| Error::Internal(format!("invalid role in users table: {}", value)))
}

/// Load a user with credentials for login verification
pub async fn find_auth_by_username<'e, E>(executor: E, username: &str) -> Result<Option<AuthUser>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT guid, username, display_name, role, password_hash, password_salt
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(executor)
    .await?;

    match row {
        Some(row) => {
            let role: String = row.get("role");
            Ok(Some(AuthUser {
                guid: row.get("guid"),
                username: row.get("username"),
                display_name: row.get("display_name"),
                role: parse_role(&role)?,
                password_hash: row.get("password_hash"),
                password_salt: row.get("password_salt"),
            }))
        }
        None => Ok(None),
    }
}

pub async fn find_user<'e, E>(executor: E, guid: &str) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT guid, username, display_name, role, created_at FROM users WHERE guid = ?",
    )
    .bind(guid)
    .fetch_optional(executor)
    .await?;

    match row {
        Some(row) => {
            let role: String = row.get("role");
            Ok(Some(User {
                guid: row.get("guid"),
                username: row.get("username"),
                display_name: row.get("display_name"),
                role: parse_role(&role)?,
                created_at: row.get("created_at"),
            }))
        }
        None => Ok(None),
    }
}

pub async fn user_exists<'e, E>(executor: E, guid: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE guid = ?)")
        .bind(guid)
        .fetch_one(executor)
        .await?;

    Ok(exists)
}

pub async fn username_taken<'e, E>(executor: E, username: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(executor)
            .await?;

    Ok(exists)
}

pub async fn insert_user<'e, E>(
    executor: E,
    guid: &str,
    username: &str,
    password_hash: &str,
    password_salt: &str,
    display_name: &str,
    role: Role,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO users (guid, username, password_hash, password_salt, display_name, role)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(guid)
    .bind(username)
    .bind(password_hash)
    .bind(password_salt)
    .bind(display_name)
    .bind(role.as_str())
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn list_users<'e, E>(executor: E) -> Result<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT guid, username, display_name, role, created_at FROM users ORDER BY username",
    )
    .fetch_all(executor)
    .await?;

    rows.iter()
        .map(|row| {
            let role: String = row.get("role");
            Ok(User {
                guid: row.get("guid"),
                username: row.get("username"),
                display_name: row.get("display_name"),
                role: parse_role(&role)?,
                created_at: row.get("created_at"),
            })
        })
        .collect()
}
