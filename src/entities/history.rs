//! Audit trail entities
//!
//! `ApprovalEvent` rows are append-only and record every state-changing
//! action. `SubmissionRecord` rows capture a point-in-time snapshot of a
//! formal submission; only their `approval_status` field is ever updated
//! afterwards (when the version's review outcome changes or it is
//! obsoleted by a successor).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::actor::{Actor, RequestMeta};
use crate::core::identity::{DocumentId, ProjectId, UserId};
use crate::core::status::{ApprovalAction, ProjectStatus};

/// One immutable approval trail row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalEvent {
    /// Row id, assigned by the store on insert
    #[serde(default)]
    pub id: i64,

    pub project_id: ProjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,

    /// Version number of the project at the time of the action
    pub version: u32,

    pub action: ApprovalAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<ProjectStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<ProjectStatus>,

    pub performed_by: UserId,

    pub performed_at: DateTime<Utc>,

    #[serde(default)]
    pub comments: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ApprovalEvent {
    /// Build a trail row for an action performed by `actor`
    pub fn record(
        project_id: ProjectId,
        version: u32,
        action: ApprovalAction,
        actor: &Actor,
        meta: &RequestMeta,
    ) -> Self {
        Self {
            id: 0,
            project_id,
            document_id: None,
            version,
            action,
            previous_status: None,
            new_status: None,
            performed_by: actor.id,
            performed_at: Utc::now(),
            comments: String::new(),
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
        }
    }

    pub fn with_transition(
        mut self,
        from: Option<ProjectStatus>,
        to: ProjectStatus,
    ) -> Self {
        self.previous_status = from;
        self.new_status = Some(to);
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }
}

/// Snapshot of one formal submission of a project version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Row id, assigned by the store on insert
    #[serde(default)]
    pub id: i64,

    pub project_id: ProjectId,

    pub version: u32,

    pub submitted_by: UserId,

    pub date_submitted: DateTime<Utc>,

    #[serde(default)]
    pub submission_link: String,

    /// Number of active documents at submission time
    pub document_count: u32,

    /// Comma-joined document numbers at submission time
    #[serde(default)]
    pub document_numbers: String,

    /// Unique receipt identifier handed back to the submitter
    pub receipt_id: String,

    pub approval_status: ProjectStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actor::Role;

    #[test]
    fn test_record_carries_request_meta() {
        let actor = Actor::with_role(UserId::new(), "jsmith", Role::Approver);
        let meta = RequestMeta {
            ip_address: Some("10.0.0.7".to_string()),
            user_agent: Some("test-agent".to_string()),
        };

        let event = ApprovalEvent::record(
            ProjectId::new(),
            2,
            ApprovalAction::Approved,
            &actor,
            &meta,
        )
        .with_transition(
            Some(ProjectStatus::PendingApproval),
            ProjectStatus::Approved,
        )
        .with_comments("Checked against markups");

        assert_eq!(event.version, 2);
        assert_eq!(event.performed_by, actor.id);
        assert_eq!(event.previous_status, Some(ProjectStatus::PendingApproval));
        assert_eq!(event.new_status, Some(ProjectStatus::Approved));
        assert_eq!(event.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(event.user_agent.as_deref(), Some("test-agent"));
    }
}
