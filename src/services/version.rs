//! Project version service
//!
//! Cuts a new draft version from a predecessor, carrying active documents
//! forward and obsoleting the predecessor, all in one transaction.

use chrono::Utc;

use crate::core::actor::{Actor, RequestMeta};
use crate::core::identity::{GroupId, ProjectId};
use crate::core::permissions::can_create_new_version;
use crate::core::status::{ApprovalAction, ProjectStatus};
use crate::entities::{ApprovalEvent, Project};
use crate::store::{documents, history, projects, Store};

use super::WorkflowError;

/// Service for handling project version management
pub struct VersionService<'a> {
    store: &'a mut Store,
}

impl<'a> VersionService<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Next version number for a group: 1 + the highest ever allocated.
    /// Numbers are never reused, even after obsolescence.
    pub fn next_version_number(&self, group_id: &GroupId) -> Result<u32, WorkflowError> {
        Ok(projects::max_version(self.store.conn(), group_id)?.unwrap_or(0) + 1)
    }

    /// Create a new version of an existing project.
    ///
    /// The service enforces [`can_create_new_version`] itself: only the
    /// original submitter, only on the latest version, only from a
    /// versionable status. The whole operation is atomic; a failure leaves
    /// no partial clone behind. The new version gets no submission record
    /// here; one is created only when it is actually submitted for review.
    pub fn create_new_version(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        revision_notes: &str,
        meta: &RequestMeta,
    ) -> Result<Project, WorkflowError> {
        let result = self.create_inner(project_id, actor, revision_notes, meta);
        match &result {
            Ok(new_project) => tracing::info!(
                project = %new_project.id,
                version = new_project.version,
                actor = %actor.username,
                "new project version created"
            ),
            Err(err) => tracing::error!(
                project = %project_id,
                actor = %actor.username,
                %err,
                "failed to create new version"
            ),
        }
        result
    }

    fn create_inner(
        &mut self,
        project_id: &ProjectId,
        actor: &Actor,
        revision_notes: &str,
        meta: &RequestMeta,
    ) -> Result<Project, WorkflowError> {
        let tx = self.store.immediate_tx()?;

        let mut original = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;

        if !can_create_new_version(actor, &original) {
            return Err(WorkflowError::NotAuthorized {
                action: "create a new version of this project",
            });
        }

        // The immediate transaction serializes writers, so max+1 cannot be
        // allocated twice; UNIQUE(group_id, version) backstops it anyway.
        let next_version = projects::max_version(&tx, &original.group_id)?.unwrap_or(0) + 1;

        let new_project = original.next_version(next_version, actor.id, revision_notes);
        projects::insert_as_latest(&tx, &new_project)?;

        for document in documents::active_for_project(&tx, &original.id)? {
            documents::insert(&tx, &document.clone_for(new_project.id, actor.id))?;
        }

        let comment = if revision_notes.trim().is_empty() {
            format!("New version created from {}", original.version_display())
        } else {
            format!(
                "New version created from {}. {}",
                original.version_display(),
                revision_notes.trim()
            )
        };
        history::append(
            &tx,
            &ApprovalEvent::record(
                new_project.id,
                new_project.version,
                ApprovalAction::VersionCreated,
                actor,
                meta,
            )
            .with_transition(Some(original.status), ProjectStatus::Draft)
            .with_comments(comment),
        )?;

        // The predecessor leaves the workflow: obsolete its project row and
        // its submission snapshot, and leave an audit row saying why.
        let previous_status = original.status;
        original.status = ProjectStatus::Obsolete;
        original.is_latest = false;
        original.updated_at = Utc::now();
        projects::update(&tx, &original)?;

        history::append(
            &tx,
            &ApprovalEvent::record(
                original.id,
                original.version,
                ApprovalAction::Obsoleted,
                actor,
                meta,
            )
            .with_transition(Some(previous_status), ProjectStatus::Obsolete)
            .with_comments(format!("Superseded by {}", new_project.version_display())),
        )?;

        history::set_submission_status(&tx, &original.id, original.version, ProjectStatus::Obsolete)?;

        tx.commit()?;
        Ok(new_project)
    }
}
