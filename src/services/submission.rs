//! Submission and review service
//!
//! Drives the status transitions of the review pipeline. Every operation
//! validates before writing, mutates the project and appends its trail row
//! in one transaction, and notifies interested parties after the commit.

use chrono::Utc;

use crate::core::actor::{Actor, RequestMeta};
use crate::core::identity::{new_receipt_id, ProjectId};
use crate::core::permissions::{is_project_administrator, is_project_manager};
use crate::core::status::{ApprovalAction, ProjectStatus};
use crate::entities::{ApprovalEvent, Project, SubmissionRecord};
use crate::notify::{EventContext, EventKind, Notifier};
use crate::store::{documents, history, projects, users, Store};

use super::WorkflowError;

/// Parameters shared by the two negative review outcomes
struct ReviewDecision {
    new_status: ProjectStatus,
    action: ApprovalAction,
    event: EventKind,
    log_label: &'static str,
}

/// Service for handling project submissions and review decisions
pub struct SubmissionService<'a> {
    store: &'a mut Store,
    notifier: &'a dyn Notifier,
}

impl<'a> SubmissionService<'a> {
    pub fn new(store: &'a mut Store, notifier: &'a dyn Notifier) -> Self {
        Self { store, notifier }
    }

    /// Submit a project for approval.
    ///
    /// Legal from Draft or RevisionRequested, for the project's submitter
    /// (or an administrator), and only with at least one active document.
    /// Creates the submission snapshot with a fresh receipt id and alerts
    /// the review team.
    pub fn submit_for_approval(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        meta: &RequestMeta,
    ) -> Result<SubmissionRecord, WorkflowError> {
        let result = self.submit_inner(project_id, actor, meta);
        match &result {
            Ok(record) => tracing::info!(
                project = %project_id,
                receipt = %record.receipt_id,
                actor = %actor.username,
                "project submitted for approval"
            ),
            Err(err) => tracing::error!(
                project = %project_id,
                actor = %actor.username,
                %err,
                "failed to submit project"
            ),
        }
        result
    }

    fn submit_inner(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        meta: &RequestMeta,
    ) -> Result<SubmissionRecord, WorkflowError> {
        let tx = self.store.immediate_tx()?;

        let mut project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;

        if actor.id != project.submitted_by && !is_project_administrator(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "submit this project",
            });
        }
        if !project.status.is_submittable() {
            return Err(WorkflowError::InvalidTransition {
                from: project.status,
                to: ProjectStatus::PendingApproval,
            });
        }

        let active_docs = documents::active_for_project(&tx, &project.id)?;
        if active_docs.is_empty() {
            return Err(WorkflowError::NoActiveDocuments);
        }

        let now = Utc::now();
        let previous = project.status;
        let resubmission = previous == ProjectStatus::RevisionRequested;

        project.status = ProjectStatus::PendingApproval;
        project.date_submitted = Some(now);
        project.updated_at = now;
        projects::update(&tx, &project)?;

        let action = if resubmission {
            ApprovalAction::Resubmitted
        } else {
            ApprovalAction::Submitted
        };
        history::append(
            &tx,
            &ApprovalEvent::record(project.id, project.version, action, actor, meta)
                .with_transition(Some(previous), ProjectStatus::PendingApproval)
                .with_comments("Project submitted for approval"),
        )?;

        let document_numbers = active_docs
            .iter()
            .map(|d| d.doc_no.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut record = SubmissionRecord {
            id: 0,
            project_id: project.id,
            version: project.version,
            submitted_by: actor.id,
            date_submitted: now,
            submission_link: String::new(),
            document_count: active_docs.len() as u32,
            document_numbers,
            receipt_id: new_receipt_id(),
            approval_status: ProjectStatus::PendingApproval,
        };
        record.id = history::insert_submission(&tx, &record)?;

        let submitter = users::by_id(&tx, &project.submitted_by)?;
        let acting_user = users::by_id(&tx, &actor.id)?;
        let review_team = users::reviewers(&tx)?;

        tx.commit()?;

        let ctx = EventContext {
            receipt_id: Some(record.receipt_id.clone()),
            ..EventContext::default()
        };
        if let Some(submitter) = &submitter {
            self.notifier.notify(
                EventKind::Submitted,
                Some(&project),
                submitter,
                acting_user.as_ref(),
                &ctx,
            );
        }
        let admin_event = if resubmission {
            EventKind::AdminResubmission
        } else {
            EventKind::AdminNewSubmission
        };
        for reviewer in &review_team {
            self.notifier
                .notify(admin_event, Some(&project), reviewer, acting_user.as_ref(), &ctx);
        }

        Ok(record)
    }

    /// Approve a pending project.
    ///
    /// Also retires the group's previous Approved version, when one exists:
    /// the predecessor goes Obsolete together with its submission snapshot,
    /// an Obsoleted trail row is written for it, and its submitter is told.
    pub fn approve_project(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        let result = self.approve_inner(project_id, actor, comments, meta);
        match &result {
            Ok(()) => tracing::info!(
                project = %project_id,
                actor = %actor.username,
                "project approved"
            ),
            Err(err) => tracing::error!(
                project = %project_id,
                actor = %actor.username,
                %err,
                "failed to approve project"
            ),
        }
        result
    }

    fn approve_inner(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        if !is_project_manager(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "review this project",
            });
        }

        let tx = self.store.immediate_tx()?;

        let mut project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;
        if project.status != ProjectStatus::PendingApproval {
            return Err(WorkflowError::WrongStatus {
                expected: ProjectStatus::PendingApproval,
                current: project.status,
            });
        }

        let now = Utc::now();
        project.status = ProjectStatus::Approved;
        project.date_reviewed = Some(now);
        project.reviewed_by = Some(actor.id);
        project.review_comments = comments.to_string();
        project.updated_at = now;
        projects::update(&tx, &project)?;

        history::append(
            &tx,
            &ApprovalEvent::record(
                project.id,
                project.version,
                ApprovalAction::Approved,
                actor,
                meta,
            )
            .with_transition(Some(ProjectStatus::PendingApproval), ProjectStatus::Approved)
            .with_comments(comments),
        )?;
        history::set_submission_status(&tx, &project.id, project.version, ProjectStatus::Approved)?;

        // Approving a successor retires the version it replaces.
        let predecessor = obsolete_predecessor(&tx, &project, actor, meta)?;

        let submitter = users::by_id(&tx, &project.submitted_by)?;
        let acting_user = users::by_id(&tx, &actor.id)?;
        let predecessor_submitter = match &predecessor {
            Some(p) => users::by_id(&tx, &p.submitted_by)?,
            None => None,
        };

        tx.commit()?;

        let ctx = EventContext {
            comments: non_empty(comments),
            ..EventContext::default()
        };
        if let Some(submitter) = &submitter {
            self.notifier.notify(
                EventKind::Approved,
                Some(&project),
                submitter,
                acting_user.as_ref(),
                &ctx,
            );
        }
        if let (Some(predecessor), Some(recipient)) = (&predecessor, &predecessor_submitter) {
            self.notifier.notify(
                EventKind::Obsoleted,
                Some(predecessor),
                recipient,
                acting_user.as_ref(),
                &EventContext::default(),
            );
        }

        Ok(())
    }

    /// Reject a pending project. Requires a comment.
    pub fn reject_project(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        self.review_decision(
            project_id,
            actor,
            comments,
            meta,
            ReviewDecision {
                new_status: ProjectStatus::Rejected,
                action: ApprovalAction::Rejected,
                event: EventKind::Rejected,
                log_label: "reject",
            },
        )
    }

    /// Send a pending project back for revision. Requires a comment.
    pub fn request_revision(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        self.review_decision(
            project_id,
            actor,
            comments,
            meta,
            ReviewDecision {
                new_status: ProjectStatus::RevisionRequested,
                action: ApprovalAction::StatusChanged,
                event: EventKind::RevisionRequested,
                log_label: "request revision for",
            },
        )
    }

    fn review_decision(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
        decision: ReviewDecision,
    ) -> Result<(), WorkflowError> {
        let result = self.review_decision_inner(project_id, actor, comments, meta, &decision);
        match &result {
            Ok(()) => tracing::info!(
                project = %project_id,
                actor = %actor.username,
                outcome = %decision.new_status,
                "review decision recorded"
            ),
            Err(err) => tracing::error!(
                project = %project_id,
                actor = %actor.username,
                %err,
                "failed to {} project", decision.log_label
            ),
        }
        result
    }

    fn review_decision_inner(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
        decision: &ReviewDecision,
    ) -> Result<(), WorkflowError> {
        if !is_project_manager(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "review this project",
            });
        }
        if comments.trim().is_empty() {
            return Err(WorkflowError::CommentRequired);
        }

        let tx = self.store.immediate_tx()?;

        let mut project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;
        if project.status != ProjectStatus::PendingApproval {
            return Err(WorkflowError::WrongStatus {
                expected: ProjectStatus::PendingApproval,
                current: project.status,
            });
        }

        let now = Utc::now();
        project.status = decision.new_status;
        project.date_reviewed = Some(now);
        project.reviewed_by = Some(actor.id);
        project.review_comments = comments.to_string();
        project.updated_at = now;
        projects::update(&tx, &project)?;

        history::append(
            &tx,
            &ApprovalEvent::record(project.id, project.version, decision.action, actor, meta)
                .with_transition(Some(ProjectStatus::PendingApproval), decision.new_status)
                .with_comments(comments),
        )?;
        history::set_submission_status(&tx, &project.id, project.version, decision.new_status)?;

        let submitter = users::by_id(&tx, &project.submitted_by)?;
        let acting_user = users::by_id(&tx, &actor.id)?;

        tx.commit()?;

        if let Some(submitter) = &submitter {
            let ctx = EventContext {
                comments: non_empty(comments),
                ..EventContext::default()
            };
            self.notifier
                .notify(decision.event, Some(&project), submitter, acting_user.as_ref(), &ctx);
        }

        Ok(())
    }

    /// Rescind a previously approved project. Requires a comment.
    pub fn rescind_project(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        let result = self.rescind_inner(project_id, actor, comments, meta);
        match &result {
            Ok(()) => tracing::info!(
                project = %project_id,
                actor = %actor.username,
                "project rescinded"
            ),
            Err(err) => tracing::error!(
                project = %project_id,
                actor = %actor.username,
                %err,
                "failed to rescind project"
            ),
        }
        result
    }

    fn rescind_inner(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        if !is_project_manager(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "rescind this project",
            });
        }
        if comments.trim().is_empty() {
            return Err(WorkflowError::CommentRequired);
        }

        let tx = self.store.immediate_tx()?;

        let mut project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;
        if project.status != ProjectStatus::Approved {
            return Err(WorkflowError::WrongStatus {
                expected: ProjectStatus::Approved,
                current: project.status,
            });
        }

        let now = Utc::now();
        project.status = ProjectStatus::Rescinded;
        project.updated_at = now;
        projects::update(&tx, &project)?;

        history::append(
            &tx,
            &ApprovalEvent::record(
                project.id,
                project.version,
                ApprovalAction::Rescinded,
                actor,
                meta,
            )
            .with_transition(Some(ProjectStatus::Approved), ProjectStatus::Rescinded)
            .with_comments(comments),
        )?;
        history::set_submission_status(&tx, &project.id, project.version, ProjectStatus::Rescinded)?;

        tx.commit()?;
        Ok(())
    }

    /// Return a rejected or revision-requested project to Draft so its
    /// submitter can rework it.
    pub fn reopen_project(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        let result = self.reopen_inner(project_id, actor, meta);
        match &result {
            Ok(()) => tracing::info!(
                project = %project_id,
                actor = %actor.username,
                "project reopened as draft"
            ),
            Err(err) => tracing::error!(
                project = %project_id,
                actor = %actor.username,
                %err,
                "failed to reopen project"
            ),
        }
        result
    }

    fn reopen_inner(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        let tx = self.store.immediate_tx()?;

        let mut project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;

        if actor.id != project.submitted_by && !is_project_administrator(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "reopen this project",
            });
        }
        if !project.status.can_transition(ProjectStatus::Draft) {
            return Err(WorkflowError::InvalidTransition {
                from: project.status,
                to: ProjectStatus::Draft,
            });
        }

        let previous = project.status;
        project.status = ProjectStatus::Draft;
        project.updated_at = Utc::now();
        projects::update(&tx, &project)?;

        history::append(
            &tx,
            &ApprovalEvent::record(
                project.id,
                project.version,
                ApprovalAction::StatusChanged,
                actor,
                meta,
            )
            .with_transition(Some(previous), ProjectStatus::Draft)
            .with_comments("Reopened for rework"),
        )?;

        tx.commit()?;
        Ok(())
    }
}

/// Obsolete the highest Approved version below the given one, if any.
/// No-op when the group has no approved predecessor.
fn obsolete_predecessor(
    tx: &rusqlite::Transaction<'_>,
    project: &Project,
    actor: &Actor,
    meta: &RequestMeta,
) -> Result<Option<Project>, WorkflowError> {
    let Some(mut predecessor) =
        projects::approved_predecessor(tx, &project.group_id, project.version)?
    else {
        return Ok(None);
    };

    let previous = predecessor.status;
    predecessor.status = ProjectStatus::Obsolete;
    predecessor.updated_at = Utc::now();
    projects::update(tx, &predecessor)?;

    history::append(
        tx,
        &ApprovalEvent::record(
            predecessor.id,
            predecessor.version,
            ApprovalAction::Obsoleted,
            actor,
            meta,
        )
        .with_transition(Some(previous), ProjectStatus::Obsolete)
        .with_comments(format!(
            "Superseded by approved {}",
            project.version_display()
        )),
    )?;
    history::set_submission_status(
        tx,
        &predecessor.id,
        predecessor.version,
        ProjectStatus::Obsolete,
    )?;

    Ok(Some(predecessor))
}

fn non_empty(comments: &str) -> Option<String> {
    let trimmed = comments.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
