//! Project and document register service
//!
//! Creation and editing of project groups, versions, and their document
//! registers. Review-state changes live in the submission service; this
//! one only touches editable drafts.

use chrono::{NaiveDate, Utc};

use crate::core::actor::{Actor, RequestMeta, Role};
use crate::core::identity::{DocumentId, ProjectId};
use crate::core::permissions::{can_edit_project, can_view_project, is_project_administrator};
use crate::core::status::{ApprovalAction, Discipline, DocumentStatus, Priority, ProjectStatus};
use crate::entities::{ApprovalEvent, Document, Project, ProjectGroup};
use crate::store::{documents, groups, history, projects, Store};

use super::WorkflowError;

/// Input for creating a project (group + version 1)
#[derive(Debug, Clone, Default)]
pub struct NewProjectInput {
    pub name: String,
    pub description: String,
    pub client: String,
    /// Human group code; generated sequentially when not given
    pub code: Option<String>,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
}

/// Editable fields of a draft project
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
}

/// Input for registering a document on a project
#[derive(Debug, Clone, Default)]
pub struct NewDocumentInput {
    pub doc_no: String,
    pub title: String,
    pub description: String,
    pub discipline: Discipline,
    pub doc_type: String,
    pub file_link: String,
    pub scale_ratio: String,
    pub sheet_size: String,
    pub sort_order: i64,
}

/// Service for project and document register management
pub struct ProjectService<'a> {
    store: &'a mut Store,
}

impl<'a> ProjectService<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Create a new project: a fresh group with its version 1 in Draft.
    pub fn create_project(
        &mut self,
        actor: &Actor,
        input: NewProjectInput,
        meta: &RequestMeta,
    ) -> Result<(ProjectGroup, Project), WorkflowError> {
        if !actor.is_active || (actor.role == Role::Viewer && !is_project_administrator(actor)) {
            return Err(WorkflowError::NotAuthorized {
                action: "create projects",
            });
        }

        let tx = self.store.immediate_tx()?;

        if projects::name_exists_for_user(&tx, &actor.id, &input.name)? {
            return Err(WorkflowError::DuplicateProjectName { name: input.name });
        }

        let code = match input.code {
            Some(code) => code,
            None => groups::next_code(&tx)?,
        };
        let group = ProjectGroup::new(code, &input.name, &input.client, actor.id);
        groups::insert(&tx, &group)?;

        let mut project = Project::first_version(group.id, &input.name, &input.description, actor.id);
        project.priority = input.priority;
        project.deadline = input.deadline;
        projects::insert_as_latest(&tx, &project)?;

        history::append(
            &tx,
            &ApprovalEvent::record(
                project.id,
                project.version,
                ApprovalAction::Created,
                actor,
                meta,
            )
            .with_transition(None, ProjectStatus::Draft)
            .with_comments("Project created"),
        )?;

        tx.commit()?;
        tracing::info!(
            group = %group.code,
            project = %project.id,
            actor = %actor.username,
            "project created"
        );
        Ok((group, project))
    }

    /// Apply edits to a draft project. Gated by [`can_edit_project`].
    pub fn update_project(
        &mut self,
        actor: &Actor,
        project_id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, WorkflowError> {
        let tx = self.store.immediate_tx()?;

        let mut project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;
        if !can_edit_project(actor, &project) {
            return Err(WorkflowError::NotAuthorized {
                action: "edit this project",
            });
        }

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(priority) = update.priority {
            project.priority = priority;
        }
        if let Some(deadline) = update.deadline {
            project.deadline = Some(deadline);
        }
        project.updated_at = Utc::now();
        projects::update(&tx, &project)?;

        tx.commit()?;
        Ok(project)
    }

    /// Register a document on an editable project.
    pub fn add_document(
        &mut self,
        actor: &Actor,
        project_id: &ProjectId,
        input: NewDocumentInput,
    ) -> Result<Document, WorkflowError> {
        let tx = self.store.immediate_tx()?;

        let project = projects::by_id(&tx, project_id)?
            .ok_or(WorkflowError::ProjectNotFound { id: *project_id })?;
        if !can_edit_project(actor, &project) {
            return Err(WorkflowError::NotAuthorized {
                action: "add documents to this project",
            });
        }

        let mut document = Document::new(project.id, input.doc_no, input.title, actor.id);
        document.description = input.description;
        document.discipline = input.discipline;
        document.doc_type = input.doc_type;
        document.file_link = input.file_link;
        document.scale_ratio = input.scale_ratio;
        document.sheet_size = input.sheet_size;
        document.sort_order = input.sort_order;
        document.validate()?;

        if documents::has_active_doc_no(&tx, &project.id, &document.doc_no)? {
            return Err(WorkflowError::DuplicateDocumentNumber {
                doc_no: document.doc_no,
            });
        }
        documents::insert(&tx, &document)?;

        tx.commit()?;
        tracing::info!(
            project = %project.id,
            doc_no = %document.doc_no,
            actor = %actor.username,
            "document registered"
        );
        Ok(document)
    }

    /// Retire a document from an editable project's active register.
    pub fn remove_document(
        &mut self,
        actor: &Actor,
        document_id: &DocumentId,
    ) -> Result<(), WorkflowError> {
        let tx = self.store.immediate_tx()?;

        let Some(document) = documents::by_id(&tx, document_id)? else {
            // Treat an unknown document like an unknown project target.
            return Err(WorkflowError::NotAuthorized {
                action: "remove this document",
            });
        };
        let project = projects::by_id(&tx, &document.project_id)?.ok_or(
            WorkflowError::ProjectNotFound {
                id: document.project_id,
            },
        )?;
        if !can_edit_project(actor, &project) {
            return Err(WorkflowError::NotAuthorized {
                action: "remove this document",
            });
        }

        documents::set_status(&tx, &document.id, DocumentStatus::Inactive)?;
        tx.commit()?;
        Ok(())
    }

    /// Projects visible to the actor under the viewing rules.
    pub fn visible_projects(&self, actor: &Actor) -> Result<Vec<Project>, WorkflowError> {
        let all = projects::all(self.store.conn())?;
        Ok(all
            .into_iter()
            .filter(|p| can_view_project(actor, p))
            .collect())
    }
}
