//! Restore service
//!
//! Administrative recovery of obsoleted projects back into the workflow.

use chrono::Utc;

use crate::core::actor::{Actor, RequestMeta};
use crate::core::identity::ProjectId;
use crate::core::permissions::is_project_administrator;
use crate::core::status::{ApprovalAction, ProjectStatus};
use crate::entities::ApprovalEvent;
use crate::store::{history, projects, Store};

use super::WorkflowError;

/// Service for restoring obsoleted projects
pub struct RestoreService<'a> {
    store: &'a mut Store,
}

impl<'a> RestoreService<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Move an obsolete project to the chosen target status.
    ///
    /// Fails with no state change when the project is not Obsolete or when
    /// the target is Obsolete itself.
    pub fn restore_project(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        restore_to: ProjectStatus,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        let result = self.restore_inner(project_id, actor, restore_to, comments, meta);
        match &result {
            Ok(()) => tracing::info!(
                project = %project_id,
                target = %restore_to,
                actor = %actor.username,
                "project restored"
            ),
            Err(err) => tracing::error!(
                project = %project_id,
                actor = %actor.username,
                %err,
                "failed to restore project"
            ),
        }
        result
    }

    fn restore_inner(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        restore_to: ProjectStatus,
        comments: &str,
        meta: &RequestMeta,
    ) -> Result<(), WorkflowError> {
        if !is_project_administrator(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "restore this project",
            });
        }
        if restore_to == ProjectStatus::Obsolete {
            return Err(WorkflowError::InvalidRestoreTarget { target: restore_to });
        }

        let tx = self.store.immediate_tx()?;

        let mut project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;
        if project.status != ProjectStatus::Obsolete {
            return Err(WorkflowError::NotObsolete {
                current: project.status,
            });
        }

        project.status = restore_to;
        project.updated_at = Utc::now();
        projects::update(&tx, &project)?;

        let comment = if comments.trim().is_empty() {
            format!("Project restored from obsolete to {}", restore_to)
        } else {
            format!(
                "Project restored from obsolete to {}. {}",
                restore_to,
                comments.trim()
            )
        };
        history::append(
            &tx,
            &ApprovalEvent::record(
                project.id,
                project.version,
                ApprovalAction::StatusChanged,
                actor,
                meta,
            )
            .with_transition(Some(ProjectStatus::Obsolete), restore_to)
            .with_comments(comment),
        )?;
        history::set_submission_status(&tx, &project.id, project.version, restore_to)?;

        tx.commit()?;
        Ok(())
    }
}
