//! Bulk operation dispatcher
//!
//! Applies one operation to a list of targets. Each target is an
//! independent unit of work: a target that cannot be mutated (unknown
//! id, actor not a reviewer, already decided) is skipped and the loop
//! continues, so earlier mutations stay committed. The returned count
//! is exactly the number of targets actually mutated.
//!
//! Batch-level validation (operation name, required data fields) is
//! done by the handlers in api/bulk.rs before the first mutation.

use crate::db::{activity, notifications, projects};
use crate::review;
use launchkit_common::db::models::{ApprovalStatus, NotificationType, ProjectPhase};
use launchkit_common::Result;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;

/// Operations accepted by POST /api/bulk/approvals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOperation {
    Approve,
    Reject,
}

impl ApprovalOperation {
    pub fn parse(s: &str) -> Option<ApprovalOperation> {
        match s {
            "approve" => Some(ApprovalOperation::Approve),
            "reject" => Some(ApprovalOperation::Reject),
            _ => None,
        }
    }
}

/// Operations accepted by POST /api/bulk/projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOperation {
    UpdateStatus,
    AssignLead,
    Delete,
}

impl ProjectOperation {
    pub fn parse(s: &str) -> Option<ProjectOperation> {
        match s {
            "updateStatus" => Some(ProjectOperation::UpdateStatus),
            "assignLead" => Some(ProjectOperation::AssignLead),
            "delete" => Some(ProjectOperation::Delete),
            _ => None,
        }
    }
}

/// Payload for a project bulk operation, validated by the handler
#[derive(Debug, Clone)]
pub enum ProjectOperationData {
    UpdateStatus { phase: ProjectPhase },
    AssignLead { lead_user_id: String },
    Delete,
}

/// Apply approve/reject to each approval id the actor can review.
///
/// Targets where the actor has no reviewer row, already decided, or the
/// id is unknown are skipped. Returns the number of approvals mutated.
pub async fn run_approval_operation(
    pool: &SqlitePool,
    actor_id: &str,
    operation: ApprovalOperation,
    approval_ids: &[String],
    feedback: Option<&str>,
) -> Result<u64> {
    let decision = match operation {
        ApprovalOperation::Approve => ApprovalStatus::Approved,
        ApprovalOperation::Reject => ApprovalStatus::ChangesRequested,
    };

    let mut updated = 0u64;
    for approval_id in approval_ids {
        match review::submit_review(pool, approval_id, actor_id, decision, feedback).await {
            Ok(_) => updated += 1,
            Err(e) => {
                debug!("bulk {:?} skipped approval {}: {}", operation, approval_id, e);
            }
        }
    }

    Ok(updated)
}

/// Apply a project operation to each project id.
///
/// Unknown ids are skipped. One activity row is written per mutated
/// project; the project's lead strategist is notified unless they are
/// the actor or the project has no lead.
pub async fn run_project_operation(
    pool: &SqlitePool,
    actor_id: &str,
    project_ids: &[String],
    data: &ProjectOperationData,
) -> Result<u64> {
    let mut updated = 0u64;

    for project_id in project_ids {
        match apply_project_operation(pool, actor_id, project_id, data).await {
            Ok(true) => updated += 1,
            Ok(false) => debug!("bulk project op skipped {}: not found", project_id),
            Err(e) => debug!("bulk project op skipped {}: {}", project_id, e),
        }
    }

    Ok(updated)
}

async fn apply_project_operation(
    pool: &SqlitePool,
    actor_id: &str,
    project_id: &str,
    data: &ProjectOperationData,
) -> Result<bool> {
    let project = match projects::find_project(pool, project_id).await? {
        Some(p) => p,
        None => return Ok(false),
    };

    match data {
        ProjectOperationData::UpdateStatus { phase } => {
            if projects::update_phase(pool, project_id, *phase).await? == 0 {
                return Ok(false);
            }

            activity::record(
                pool,
                project_id,
                actor_id,
                "project_status_changed",
                &format!("moved project to {}", phase.as_str()),
                json!({ "from": project.phase, "to": phase }),
            )
            .await?;

            notify_lead(
                pool,
                project.lead_user_id.as_deref(),
                actor_id,
                &notifications::NewNotification {
                    notification_type: NotificationType::ProjectStatusChanged,
                    title: "Project phase updated".to_string(),
                    message: format!(
                        "{} moved to the {} phase",
                        project.name,
                        phase.as_str()
                    ),
                    action_url: Some(format!("/projects/{}", project_id)),
                    project_id: Some(project_id.to_string()),
                    approval_id: None,
                    triggered_by: Some(actor_id.to_string()),
                },
            )
            .await?;
        }
        ProjectOperationData::AssignLead { lead_user_id } => {
            if projects::assign_lead(pool, project_id, lead_user_id).await? == 0 {
                return Ok(false);
            }

            activity::record(
                pool,
                project_id,
                actor_id,
                "lead_assigned",
                "assigned a new lead strategist",
                json!({ "leadId": lead_user_id }),
            )
            .await?;

            notify_lead(
                pool,
                Some(lead_user_id.as_str()),
                actor_id,
                &notifications::NewNotification {
                    notification_type: NotificationType::ProjectAssigned,
                    title: "Project assigned to you".to_string(),
                    message: format!("You are now the lead strategist on {}", project.name),
                    action_url: Some(format!("/projects/{}", project_id)),
                    project_id: Some(project_id.to_string()),
                    approval_id: None,
                    triggered_by: Some(actor_id.to_string()),
                },
            )
            .await?;
        }
        ProjectOperationData::Delete => {
            if projects::delete_project(pool, project_id).await? == 0 {
                return Ok(false);
            }

            // The activity row is written after the delete; the log has
            // no foreign key so it survives the project
            activity::record(
                pool,
                project_id,
                actor_id,
                "project_deleted",
                &format!("deleted project {}", project.name),
                json!({ "name": project.name }),
            )
            .await?;

            notify_lead(
                pool,
                project.lead_user_id.as_deref(),
                actor_id,
                &notifications::NewNotification {
                    notification_type: NotificationType::ProjectDeleted,
                    title: "Project deleted".to_string(),
                    message: format!("{} has been deleted", project.name),
                    action_url: None,
                    project_id: Some(project_id.to_string()),
                    approval_id: None,
                    triggered_by: Some(actor_id.to_string()),
                },
            )
            .await?;
        }
    }

    Ok(true)
}

async fn notify_lead(
    pool: &SqlitePool,
    lead_user_id: Option<&str>,
    actor_id: &str,
    notification: &notifications::NewNotification,
) -> Result<()> {
    match lead_user_id {
        Some(lead) if lead != actor_id => {
            notifications::notify_one(pool, lead, notification).await
        }
        _ => Ok(()),
    }
}
