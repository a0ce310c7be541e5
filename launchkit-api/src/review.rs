//! Approval review aggregation
//!
//! The overall status of an approval request is a pure function of its
//! reviewers' decisions: any rejection makes it CHANGES_REQUESTED, an
//! undecided reviewer otherwise keeps it PENDING, and it is APPROVED
//! only once every reviewer has approved.
//!
//! `submit_review` runs the whole read-aggregate-write sequence inside
//! one transaction so two reviewers deciding at the same moment cannot
//! leave a stale aggregate behind.

use crate::db::{activity, approvals, notifications};
use launchkit_common::db::models::{ApprovalStatus, NotificationType};
use launchkit_common::{Error, Result};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;

/// Outcome of one reviewer decision
#[derive(Debug, Clone, Copy)]
pub struct ReviewOutcome {
    pub reviewer_status: ApprovalStatus,
    pub overall_status: ApprovalStatus,
    pub all_reviews_complete: bool,
}

/// Derive the overall status from the reviewer decisions.
///
/// Rejection dominates: one CHANGES_REQUESTED decides the request even
/// while other reviewers are still pending. A request with no recorded
/// reviewers stays pending.
pub fn overall_status(statuses: &[ApprovalStatus]) -> ApprovalStatus {
    if statuses
        .iter()
        .any(|s| *s == ApprovalStatus::ChangesRequested)
    {
        ApprovalStatus::ChangesRequested
    } else if statuses.is_empty() || statuses.iter().any(|s| *s == ApprovalStatus::Pending) {
        ApprovalStatus::Pending
    } else {
        ApprovalStatus::Approved
    }
}

/// Persist one reviewer's decision and recompute the overall status.
///
/// Fails with NotFound for an unknown approval, Forbidden when the
/// actor has no reviewer row, Validation for a PENDING "decision", and
/// Conflict when the actor already decided (the first decision stands).
pub async fn submit_review(
    pool: &SqlitePool,
    approval_id: &str,
    actor_id: &str,
    decision: ApprovalStatus,
    feedback: Option<&str>,
) -> Result<ReviewOutcome> {
    if decision == ApprovalStatus::Pending {
        return Err(Error::Validation(
            "review status must be APPROVED or CHANGES_REQUESTED".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let request = approvals::find_request(&mut *tx, approval_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("approval request {}", approval_id)))?;

    let current = approvals::reviewer_status(&mut *tx, approval_id, actor_id)
        .await?
        .ok_or_else(|| {
            Error::Forbidden("you are not a reviewer on this approval".to_string())
        })?;

    if current != ApprovalStatus::Pending {
        return Err(Error::Conflict(
            "you have already submitted a review for this approval".to_string(),
        ));
    }

    approvals::set_reviewer_decision(&mut *tx, approval_id, actor_id, decision, feedback).await?;

    let statuses = approvals::reviewer_statuses(&mut *tx, approval_id).await?;
    let overall = overall_status(&statuses);
    let all_complete = !statuses.contains(&ApprovalStatus::Pending);

    if overall != request.status {
        approvals::set_request_status(&mut *tx, approval_id, overall).await?;
    }

    let verb = match decision {
        ApprovalStatus::Approved => "approved",
        _ => "requested changes on",
    };
    activity::record(
        &mut *tx,
        &request.project_id,
        actor_id,
        "approval_reviewed",
        &format!("{} approval request", verb),
        json!({
            "approvalId": approval_id,
            "status": decision,
            "overallStatus": overall,
        }),
    )
    .await?;

    // Tell the requester once the request settles, unless they are the
    // one reviewing it
    if overall != request.status
        && overall != ApprovalStatus::Pending
        && request.requester_id != actor_id
    {
        let (kind, title) = match overall {
            ApprovalStatus::Approved => {
                (NotificationType::ApprovalApproved, "Approval complete")
            }
            _ => (
                NotificationType::ApprovalChangesRequested,
                "Changes requested",
            ),
        };

        notifications::notify_one(
            &mut *tx,
            &request.requester_id,
            &notifications::NewNotification {
                notification_type: kind,
                title: title.to_string(),
                message: format!("Your approval request has been {}", match overall {
                    ApprovalStatus::Approved => "approved by all reviewers",
                    _ => "returned with requested changes",
                }),
                action_url: Some(format!(
                    "/projects/{}/approvals/{}",
                    request.project_id, approval_id
                )),
                project_id: Some(request.project_id.clone()),
                approval_id: Some(approval_id.to_string()),
                triggered_by: Some(actor_id.to_string()),
            },
        )
        .await?;
    }

    tx.commit().await?;

    debug!(
        "review recorded: approval={} reviewer={} decision={} overall={}",
        approval_id,
        actor_id,
        decision.as_str(),
        overall.as_str()
    );

    Ok(ReviewOutcome {
        reviewer_status: decision,
        overall_status: overall,
        all_reviews_complete: all_complete,
    })
}
