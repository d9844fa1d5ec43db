//! Project version entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{GroupId, ProjectId, UserId};
use crate::core::status::{Priority, ProjectStatus};

/// One version of a project within its group
///
/// Invariants: `version` is unique within the group and never reused;
/// at most one version per group carries `is_latest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,

    pub group_id: GroupId,

    /// Version number, 1-based and monotonically increasing per group
    pub version: u32,

    /// Whether this is the group's current version
    pub is_latest: bool,

    /// Name snapshot carried by this version
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    /// Notes explaining why this version was cut from its predecessor
    #[serde(default)]
    pub revision_notes: String,

    /// Original submitter (the authorship chain owner)
    pub submitted_by: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_submitted: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_reviewed: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<UserId>,

    #[serde(default)]
    pub review_comments: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create version 1 of a new group, in Draft and flagged latest
    pub fn first_version(
        group_id: GroupId,
        name: impl Into<String>,
        description: impl Into<String>,
        submitted_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            group_id,
            version: 1,
            is_latest: true,
            name: name.into(),
            description: description.into(),
            status: ProjectStatus::Draft,
            priority: Priority::default(),
            deadline: None,
            revision_notes: String::new(),
            submitted_by,
            date_submitted: None,
            date_reviewed: None,
            reviewed_by: None,
            review_comments: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Cut the next version from this one, carrying the descriptive snapshot
    /// forward. Status resets to Draft and review stamps are cleared.
    pub fn next_version(
        &self,
        version: u32,
        submitted_by: UserId,
        revision_notes: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            group_id: self.group_id,
            version,
            is_latest: true,
            name: self.name.clone(),
            description: self.description.clone(),
            status: ProjectStatus::Draft,
            priority: self.priority,
            deadline: self.deadline,
            revision_notes: revision_notes.into(),
            submitted_by,
            date_submitted: None,
            date_reviewed: None,
            reviewed_by: None,
            review_comments: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Zero-padded version label, e.g. `V003`
    pub fn version_display(&self) -> String {
        format!("V{:03}", self.version)
    }
}
