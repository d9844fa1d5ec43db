//! Entity type definitions

pub mod document;
pub mod group;
pub mod history;
pub mod project;
pub mod user;

pub use document::{Document, DocumentError};
pub use group::ProjectGroup;
pub use history::{ApprovalEvent, SubmissionRecord};
pub use project::Project;
pub use user::User;
