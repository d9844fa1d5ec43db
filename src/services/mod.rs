//! Workflow services
//!
//! Each service method runs inside one IMMEDIATE store transaction:
//! validation and permission checks happen before any write, mutations and
//! trail rows commit together, and notifications go out only after the
//! commit so a delivery failure can never roll business state back.
//! Errors are typed values; nothing panics across the service boundary.

pub mod accounts;
pub mod bulk;
pub mod project;
pub mod restore;
pub mod stats;
pub mod submission;
pub mod version;

use thiserror::Error;

use crate::core::identity::ProjectId;
use crate::core::status::ProjectStatus;
use crate::entities::DocumentError;
use crate::store::StoreError;

pub use accounts::{NewUser, UserAccountService};
pub use bulk::{BulkOutcome, BulkReviewService};
pub use project::{NewDocumentInput, NewProjectInput, ProjectService, ProjectUpdate};
pub use restore::RestoreService;
pub use stats::{AdminDashboard, GroupStats, ProjectStatsService, UserProjectStats};
pub use submission::SubmissionService;
pub use version::VersionService;

/// Errors that can occur during workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Project not found: {id}")]
    ProjectNotFound { id: ProjectId },

    #[error("Unknown user: {username}")]
    UnknownUser { username: String },

    #[error("Username already taken: {username}")]
    DuplicateUsername { username: String },

    #[error("You already have an active project with this name")]
    DuplicateProjectName { name: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ProjectStatus,
        to: ProjectStatus,
    },

    #[error("Project is not in {expected} status (current: {current})")]
    WrongStatus {
        expected: ProjectStatus,
        current: ProjectStatus,
    },

    #[error("Not authorized to {action}")]
    NotAuthorized { action: &'static str },

    #[error("A comment is required for this action")]
    CommentRequired,

    #[error("Project has no active documents to submit")]
    NoActiveDocuments,

    #[error("Document number {doc_no} already exists in this project")]
    DuplicateDocumentNumber { doc_no: String },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Only obsolete projects can be restored (current: {current})")]
    NotObsolete { current: ProjectStatus },

    #[error("Cannot restore a project to {target}")]
    InvalidRestoreTarget { target: ProjectStatus },

    #[error("You cannot change your own account flags")]
    CannotModifySelf,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for WorkflowError {
    fn from(err: rusqlite::Error) -> Self {
        WorkflowError::Store(StoreError::Sqlite(err))
    }
}
