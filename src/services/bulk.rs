//! Bulk review operations
//!
//! Applies the single-project review logic to a batch. The batch is first
//! narrowed to projects still in PendingApproval; anything else in the id
//! list is silently excluded rather than reported as an error. One item's
//! failure never aborts the rest.

use crate::core::actor::{Actor, RequestMeta};
use crate::core::identity::ProjectId;
use crate::core::permissions::is_project_manager;
use crate::core::status::ProjectStatus;
use crate::notify::Notifier;
use crate::store::{projects, Store};

use super::{SubmissionService, WorkflowError};

/// Per-item results of a bulk action
#[derive(Debug, Default)]
pub struct BulkOutcome {
    /// Names of projects the action succeeded for
    pub success: Vec<String>,
    /// Human-readable failure messages for items that errored
    pub errors: Vec<String>,
}

/// Service for bulk operations on pending projects
pub struct BulkReviewService<'a> {
    store: &'a mut Store,
    notifier: &'a dyn Notifier,
}

impl<'a> BulkReviewService<'a> {
    pub fn new(store: &'a mut Store, notifier: &'a dyn Notifier) -> Self {
        Self { store, notifier }
    }

    /// Approve every pending project in the id list
    pub fn bulk_approve(
        &mut self,
        ids: &[ProjectId],
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<BulkOutcome, WorkflowError> {
        if !is_project_manager(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "bulk review projects",
            });
        }
        let comments = batch_comment("Bulk approval", comments);
        self.for_each_pending(ids, |service, id| {
            service.approve_project(id, actor, &comments, meta)
        })
    }

    /// Reject every pending project in the id list. Requires a comment.
    pub fn bulk_reject(
        &mut self,
        ids: &[ProjectId],
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<BulkOutcome, WorkflowError> {
        if !is_project_manager(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "bulk review projects",
            });
        }
        if comments.trim().is_empty() {
            return Err(WorkflowError::CommentRequired);
        }
        let comments = batch_comment("Bulk rejection", comments);
        self.for_each_pending(ids, |service, id| {
            service.reject_project(id, actor, &comments, meta)
        })
    }

    /// Request revision on every pending project in the id list.
    /// Requires a comment.
    pub fn bulk_request_revision(
        &mut self,
        ids: &[ProjectId],
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<BulkOutcome, WorkflowError> {
        if !is_project_manager(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "bulk review projects",
            });
        }
        if comments.trim().is_empty() {
            return Err(WorkflowError::CommentRequired);
        }
        let comments = batch_comment("Bulk revision request", comments);
        self.for_each_pending(ids, |service, id| {
            service.request_revision(id, actor, &comments, meta)
        })
    }

    fn for_each_pending(
        &mut self,
        ids: &[ProjectId],
        mut apply: impl FnMut(&mut SubmissionService<'_>, &ProjectId) -> Result<(), WorkflowError>,
    ) -> Result<BulkOutcome, WorkflowError> {
        let pending =
            projects::ids_with_status(self.store.conn(), ids, ProjectStatus::PendingApproval)?;

        let mut outcome = BulkOutcome::default();
        for project in pending {
            let mut service = SubmissionService::new(self.store, self.notifier);
            match apply(&mut service, &project.id) {
                Ok(()) => outcome.success.push(project.name.clone()),
                Err(err) => {
                    tracing::warn!(project = %project.id, %err, "bulk action item failed");
                    outcome.errors.push(format!("{}: {}", project.name, err));
                }
            }
        }
        Ok(outcome)
    }
}

fn batch_comment(label: &str, comments: &str) -> String {
    let trimmed = comments.trim();
    if trimmed.is_empty() {
        label.to_string()
    } else {
        format!("{}: {}", label, trimmed)
    }
}
