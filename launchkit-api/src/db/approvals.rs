//! Approval request and reviewer database operations
//!
//! The overall status column on approval_requests is written only by
//! the aggregator in review.rs.

use launchkit_common::db::models::{ApprovalRequest, ApprovalReviewer, ApprovalStatus};
use launchkit_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

fn parse_status(value: &str) -> Result<ApprovalStatus> {
    ApprovalStatus::parse(value)
        .ok_or_else(|| Error::Internal(format!("invalid approval status: {}", value)))
}

fn row_to_request(row: &SqliteRow) -> Result<ApprovalRequest> {
    let status: String = row.get("status");

    Ok(ApprovalRequest {
        guid: row.get("guid"),
        project_id: row.get("project_id"),
        requester_id: row.get("requester_id"),
        message: row.get("message"),
        due_date: row.get("due_date"),
        status: parse_status(&status)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

pub async fn insert_request<'e, E>(
    executor: E,
    guid: &str,
    project_id: &str,
    requester_id: &str,
    message: &str,
    due_date: Option<&str>,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO approval_requests (guid, project_id, requester_id, message, due_date)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(guid)
    .bind(project_id)
    .bind(requester_id)
    .bind(message)
    .bind(due_date)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn insert_reviewer<'e, E>(executor: E, approval_id: &str, reviewer_id: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO approval_reviewers (approval_id, reviewer_id) VALUES (?, ?)")
        .bind(approval_id)
        .bind(reviewer_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn find_request<'e, E>(executor: E, guid: &str) -> Result<Option<ApprovalRequest>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT guid, project_id, requester_id, message, due_date, status, created_at, updated_at
        FROM approval_requests
        WHERE guid = ?
        "#,
    )
    .bind(guid)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(row_to_request).transpose()
}

pub async fn list_reviewers<'e, E>(executor: E, approval_id: &str) -> Result<Vec<ApprovalReviewer>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT approval_id, reviewer_id, status, feedback, reviewed_at
        FROM approval_reviewers
        WHERE approval_id = ?
        ORDER BY created_at
        "#,
    )
    .bind(approval_id)
    .fetch_all(executor)
    .await?;

    rows.iter()
        .map(|row| {
            let status: String = row.get("status");
            Ok(ApprovalReviewer {
                approval_id: row.get("approval_id"),
                reviewer_id: row.get("reviewer_id"),
                status: parse_status(&status)?,
                feedback: row.get("feedback"),
                reviewed_at: row.get("reviewed_at"),
            })
        })
        .collect()
}

/// Current decision of one reviewer, None if they are not on the request
pub async fn reviewer_status<'e, E>(
    executor: E,
    approval_id: &str,
    reviewer_id: &str,
) -> Result<Option<ApprovalStatus>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let status: Option<String> = sqlx::query_scalar(
        "SELECT status FROM approval_reviewers WHERE approval_id = ? AND reviewer_id = ?",
    )
    .bind(approval_id)
    .bind(reviewer_id)
    .fetch_optional(executor)
    .await?;

    status.as_deref().map(parse_status).transpose()
}

/// Statuses of every reviewer on the request
pub async fn reviewer_statuses<'e, E>(executor: E, approval_id: &str) -> Result<Vec<ApprovalStatus>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT status FROM approval_reviewers WHERE approval_id = ?")
            .bind(approval_id)
            .fetch_all(executor)
            .await?;

    rows.iter().map(|s| parse_status(s)).collect()
}

pub async fn set_reviewer_decision<'e, E>(
    executor: E,
    approval_id: &str,
    reviewer_id: &str,
    status: ApprovalStatus,
    feedback: Option<&str>,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE approval_reviewers
        SET status = ?, feedback = ?, reviewed_at = CURRENT_TIMESTAMP
        WHERE approval_id = ? AND reviewer_id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(feedback)
    .bind(approval_id)
    .bind(reviewer_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn set_request_status<'e, E>(
    executor: E,
    guid: &str,
    status: ApprovalStatus,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE approval_requests SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ?",
    )
    .bind(status.as_str())
    .bind(guid)
    .execute(executor)
    .await?;

    Ok(())
}
