//! Shared models and status enums
//!
//! Enumerated columns are stored as TEXT (matching the CHECK constraints
//! in init.rs); `as_str`/`parse` convert between the two. The serde
//! representation uses the same SCREAMING_SNAKE_CASE wire values.

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "MEMBER" => Some(Role::Member),
            _ => None,
        }
    }
}

/// Project phase in the launch pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectPhase {
    Discovery,
    Branding,
    Manufacturing,
    Marketing,
    Launch,
}

impl ProjectPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPhase::Discovery => "DISCOVERY",
            ProjectPhase::Branding => "BRANDING",
            ProjectPhase::Manufacturing => "MANUFACTURING",
            ProjectPhase::Marketing => "MARKETING",
            ProjectPhase::Launch => "LAUNCH",
        }
    }

    pub fn parse(s: &str) -> Option<ProjectPhase> {
        match s {
            "DISCOVERY" => Some(ProjectPhase::Discovery),
            "BRANDING" => Some(ProjectPhase::Branding),
            "MANUFACTURING" => Some(ProjectPhase::Manufacturing),
            "MARKETING" => Some(ProjectPhase::Marketing),
            "LAUNCH" => Some(ProjectPhase::Launch),
            _ => None,
        }
    }
}

/// Approval status, used both per-reviewer and for the overall request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    ChangesRequested,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::ChangesRequested => "CHANGES_REQUESTED",
        }
    }

    pub fn parse(s: &str) -> Option<ApprovalStatus> {
        match s {
            "PENDING" => Some(ApprovalStatus::Pending),
            "APPROVED" => Some(ApprovalStatus::Approved),
            "CHANGES_REQUESTED" => Some(ApprovalStatus::ChangesRequested),
            _ => None,
        }
    }
}

/// Notification type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    ApprovalRequested,
    ApprovalApproved,
    ApprovalChangesRequested,
    ProjectStatusChanged,
    ProjectAssigned,
    ProjectDeleted,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::ApprovalRequested => "APPROVAL_REQUESTED",
            NotificationType::ApprovalApproved => "APPROVAL_APPROVED",
            NotificationType::ApprovalChangesRequested => "APPROVAL_CHANGES_REQUESTED",
            NotificationType::ProjectStatusChanged => "PROJECT_STATUS_CHANGED",
            NotificationType::ProjectAssigned => "PROJECT_ASSIGNED",
            NotificationType::ProjectDeleted => "PROJECT_DELETED",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationType> {
        match s {
            "APPROVAL_REQUESTED" => Some(NotificationType::ApprovalRequested),
            "APPROVAL_APPROVED" => Some(NotificationType::ApprovalApproved),
            "APPROVAL_CHANGES_REQUESTED" => Some(NotificationType::ApprovalChangesRequested),
            "PROJECT_STATUS_CHANGED" => Some(NotificationType::ProjectStatusChanged),
            "PROJECT_ASSIGNED" => Some(NotificationType::ProjectAssigned),
            "PROJECT_DELETED" => Some(NotificationType::ProjectDeleted),
            _ => None,
        }
    }
}

/// Public user shape (credentials never leave the users module)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub guid: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: String,
}

/// Branding project for one client ("creator")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub guid: String,
    pub name: String,
    pub client_name: String,
    pub phase: ProjectPhase,
    pub lead_user_id: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Sign-off request raised against a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub guid: String,
    pub project_id: String,
    pub requester_id: String,
    pub message: String,
    pub due_date: Option<String>,
    pub status: ApprovalStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// One designated reviewer's decision on an approval request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalReviewer {
    pub approval_id: String,
    pub reviewer_id: String,
    pub status: ApprovalStatus,
    pub feedback: Option<String>,
    pub reviewed_at: Option<String>,
}

/// Append-only activity log row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub guid: String,
    pub project_id: String,
    pub user_id: String,
    pub action: String,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_at: String,
}

/// Notification targeted at one recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub guid: String,
    pub user_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub project_id: Option<String>,
    pub approval_id: Option<String>,
    pub triggered_by: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}
