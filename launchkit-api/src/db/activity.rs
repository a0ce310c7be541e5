//! Activity log database operations
//!
//! Append-only: rows are inserted and listed, never updated or deleted.

use launchkit_common::db::models::Activity;
use launchkit_common::Result;
use sqlx::{Executor, Row, Sqlite};
use uuid::Uuid;

/// Append one activity row
pub async fn record<'e, E>(
    executor: E,
    project_id: &str,
    user_id: &str,
    action: &str,
    description: &str,
    metadata: serde_json::Value,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO activities (guid, project_id, user_id, action, description, metadata)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(project_id)
    .bind(user_id)
    .bind(action)
    .bind(description)
    .bind(metadata.to_string())
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn count_for_project<'e, E>(executor: E, project_id: &str) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities WHERE project_id = ?")
        .bind(project_id)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Newest-first page of a project's activity
pub async fn list_for_project<'e, E>(
    executor: E,
    project_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Activity>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT guid, project_id, user_id, action, description, metadata, created_at
        FROM activities
        WHERE project_id = ?
        ORDER BY created_at DESC, guid
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(project_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .iter()
        .map(|row| {
            let metadata: String = row.get("metadata");
            Activity {
                guid: row.get("guid"),
                project_id: row.get("project_id"),
                user_id: row.get("user_id"),
                action: row.get("action"),
                description: row.get("description"),
                metadata: serde_json::from_str(&metadata)
                    .unwrap_or(serde_json::Value::Null),
                created_at: row.get("created_at"),
            }
        })
        .collect())
}
