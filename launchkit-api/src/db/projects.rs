//! Project database operations

use launchkit_common::db::models::{Project, ProjectPhase};
use launchkit_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

fn row_to_project(row: &SqliteRow) -> Result<Project> {
    let phase: String = row.get("phase");
    let phase = ProjectPhase::parse(&phase)
        .ok_or_else(|| Error::Internal(format!("invalid phase in projects table: {}", phase)))?;

    Ok(Project {
        guid: row.get("guid"),
        name: row.get("name"),
        client_name: row.get("client_name"),
        phase,
        lead_user_id: row.get("lead_user_id"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub async fn insert_project<'e, E>(
    executor: E,
    guid: &str,
    name: &str,
    client_name: &str,
    phase: ProjectPhase,
    lead_user_id: Option<&str>,
    description: Option<&str>,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO projects (guid, name, client_name, phase, lead_user_id, description)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(guid)
    .bind(name)
    .bind(client_name)
    .bind(phase.as_str())
    .bind(lead_user_id)
    .bind(description)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn find_project<'e, E>(executor: E, guid: &str) -> Result<Option<Project>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT guid, name, client_name, phase, lead_user_id, description, created_at, updated_at
        FROM projects
        WHERE guid = ?
        "#,
    )
    .bind(guid)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(row_to_project).transpose()
}

pub async fn list_projects<'e, E>(executor: E) -> Result<Vec<Project>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT guid, name, client_name, phase, lead_user_id, description, created_at, updated_at
        FROM projects
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await?;

    rows.iter().map(row_to_project).collect()
}

/// Overwrite the mutable fields of a project; returns rows affected
pub async fn update_project<'e, E>(
    executor: E,
    guid: &str,
    name: &str,
    phase: ProjectPhase,
    lead_user_id: Option<&str>,
    description: Option<&str>,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE projects
        SET name = ?, phase = ?, lead_user_id = ?, description = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(name)
    .bind(phase.as_str())
    .bind(lead_user_id)
    .bind(description)
    .bind(guid)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn update_phase<'e, E>(executor: E, guid: &str, phase: ProjectPhase) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE projects SET phase = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ?",
    )
    .bind(phase.as_str())
    .bind(guid)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn assign_lead<'e, E>(executor: E, guid: &str, lead_user_id: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE projects SET lead_user_id = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ?",
    )
    .bind(lead_user_id)
    .bind(guid)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_project<'e, E>(executor: E, guid: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM projects WHERE guid = ?")
        .bind(guid)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
