//! Notification database operations

use launchkit_common::db::models::{Notification, NotificationType};
use launchkit_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection};
use uuid::Uuid;

/// Content of a notification, minus the recipient
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub project_id: Option<String>,
    pub approval_id: Option<String>,
    pub triggered_by: Option<String>,
}

fn row_to_notification(row: &SqliteRow) -> Result<Notification> {
    let kind: String = row.get("notification_type");
    let kind = NotificationType::parse(&kind)
        .ok_or_else(|| Error::Internal(format!("invalid notification type: {}", kind)))?;

    Ok(Notification {
        guid: row.get("guid"),
        user_id: row.get("user_id"),
        notification_type: kind,
        title: row.get("title"),
        message: row.get("message"),
        action_url: row.get("action_url"),
        project_id: row.get("project_id"),
        approval_id: row.get("approval_id"),
        triggered_by: row.get("triggered_by"),
        is_read: row.get::<i64, _>("is_read") != 0,
        created_at: row.get("created_at"),
    })
}

/// Insert one notification for one recipient
pub async fn notify_one<'e, E>(executor: E, recipient: &str, n: &NewNotification) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO notifications
            (guid, user_id, notification_type, title, message, action_url,
             project_id, approval_id, triggered_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(recipient)
    .bind(n.notification_type.as_str())
    .bind(&n.title)
    .bind(&n.message)
    .bind(&n.action_url)
    .bind(&n.project_id)
    .bind(&n.approval_id)
    .bind(&n.triggered_by)
    .execute(executor)
    .await?;

    Ok(())
}

/// Insert the same notification for a set of recipients
pub async fn notify(
    conn: &mut SqliteConnection,
    recipients: &[String],
    n: &NewNotification,
) -> Result<()> {
    for recipient in recipients {
        notify_one(&mut *conn, recipient, n).await?;
    }
    Ok(())
}

pub async fn find<'e, E>(executor: E, guid: &str) -> Result<Option<Notification>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT guid, user_id, notification_type, title, message, action_url,
               project_id, approval_id, triggered_by, is_read, created_at
        FROM notifications
        WHERE guid = ?
        "#,
    )
    .bind(guid)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(row_to_notification).transpose()
}

/// Newest-first notifications for a recipient
pub async fn list_for_user<'e, E>(
    executor: E,
    user_guid: &str,
    unread_only: bool,
) -> Result<Vec<Notification>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = if unread_only {
        r#"
        SELECT guid, user_id, notification_type, title, message, action_url,
               project_id, approval_id, triggered_by, is_read, created_at
        FROM notifications
        WHERE user_id = ? AND is_read = 0
        ORDER BY created_at DESC, guid
        "#
    } else {
        r#"
        SELECT guid, user_id, notification_type, title, message, action_url,
               project_id, approval_id, triggered_by, is_read, created_at
        FROM notifications
        WHERE user_id = ?
        ORDER BY created_at DESC, guid
        "#
    };

    let rows = sqlx::query(sql).bind(user_guid).fetch_all(executor).await?;

    rows.iter().map(row_to_notification).collect()
}

pub async fn mark_read<'e, E>(executor: E, guid: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE guid = ?")
        .bind(guid)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn mark_all_read<'e, E>(executor: E, user_guid: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
            .bind(user_guid)
            .execute(executor)
            .await?;

    Ok(result.rows_affected())
}

pub async fn delete<'e, E>(executor: E, guid: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM notifications WHERE guid = ?")
        .bind(guid)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
