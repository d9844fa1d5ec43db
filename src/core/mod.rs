//! Core module - fundamental types and utilities

pub mod actor;
pub mod config;
pub mod identity;
pub mod permissions;
pub mod status;

pub use actor::{Actor, RequestMeta, Role};
pub use config::Config;
pub use identity::{new_receipt_id, DocumentId, GroupId, IdParseError, ProjectId, UserId};
pub use status::{ApprovalAction, Discipline, DocumentStatus, Priority, ProjectStatus};
