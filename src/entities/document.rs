//! Document (drawing) entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::identity::{DocumentId, ProjectId, UserId};
use crate::core::status::{Discipline, DocumentStatus};

/// Errors raised by document validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Document number must not be empty")]
    EmptyNumber,

    #[error("Document must have either a title or description")]
    MissingTitleAndDescription,
}

/// A drawing registered on one project version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,

    pub project_id: ProjectId,

    /// Document number, upper-cased, unique among the project's active documents
    pub doc_no: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub discipline: Discipline,

    /// Free-form drawing type, e.g. "plan", "section"
    #[serde(default)]
    pub doc_type: String,

    /// Reference to the drawing file or register entry
    #[serde(default)]
    pub file_link: String,

    #[serde(default)]
    pub scale_ratio: String,

    #[serde(default)]
    pub sheet_size: String,

    /// Revision counter, incremented when cloned onto a new version
    pub revision: u32,

    #[serde(default)]
    pub status: DocumentStatus,

    #[serde(default)]
    pub sort_order: i64,

    pub added_by: UserId,

    pub added_at: DateTime<Utc>,
}

impl Document {
    /// Create a new active document at revision 0
    pub fn new(
        project_id: ProjectId,
        doc_no: impl Into<String>,
        title: impl Into<String>,
        added_by: UserId,
    ) -> Self {
        let doc_no: String = doc_no.into();
        Self {
            id: DocumentId::new(),
            project_id,
            doc_no: doc_no.trim().to_uppercase(),
            title: title.into(),
            description: String::new(),
            discipline: Discipline::default(),
            doc_type: String::new(),
            file_link: String::new(),
            scale_ratio: String::new(),
            sheet_size: String::new(),
            revision: 0,
            status: DocumentStatus::Active,
            sort_order: 0,
            added_by,
            added_at: Utc::now(),
        }
    }

    /// Clone this document onto a successor project version
    ///
    /// The clone keeps the register metadata, bumps the revision by one and
    /// starts active on the new version.
    pub fn clone_for(&self, project_id: ProjectId, added_by: UserId) -> Self {
        Self {
            id: DocumentId::new(),
            project_id,
            doc_no: self.doc_no.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            discipline: self.discipline,
            doc_type: self.doc_type.clone(),
            file_link: self.file_link.clone(),
            scale_ratio: self.scale_ratio.clone(),
            sheet_size: self.sheet_size.clone(),
            revision: self.revision + 1,
            status: DocumentStatus::Active,
            sort_order: self.sort_order,
            added_by,
            added_at: Utc::now(),
        }
    }

    /// Validate register invariants before the document is stored
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.doc_no.trim().is_empty() {
            return Err(DocumentError::EmptyNumber);
        }
        if self.title.trim().is_empty() && self.description.trim().is_empty() {
            return Err(DocumentError::MissingTitleAndDescription);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_no_is_uppercased() {
        let doc = Document::new(ProjectId::new(), " d-101a ", "Site plan", UserId::new());
        assert_eq!(doc.doc_no, "D-101A");
    }

    #[test]
    fn test_validate_requires_title_or_description() {
        let mut doc = Document::new(ProjectId::new(), "D-101", "", UserId::new());
        assert_eq!(
            doc.validate(),
            Err(DocumentError::MissingTitleAndDescription)
        );

        doc.description = "Ground floor slab details".to_string();
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_number() {
        let doc = Document::new(ProjectId::new(), "  ", "Site plan", UserId::new());
        assert_eq!(doc.validate(), Err(DocumentError::EmptyNumber));
    }

    #[test]
    fn test_clone_bumps_revision_and_resets_status() {
        let mut doc = Document::new(ProjectId::new(), "D-101", "Site plan", UserId::new());
        doc.revision = 3;
        doc.status = DocumentStatus::Active;
        doc.sheet_size = "A1".to_string();

        let successor_project = ProjectId::new();
        let clone = doc.clone_for(successor_project, UserId::new());

        assert_ne!(clone.id, doc.id);
        assert_eq!(clone.project_id, successor_project);
        assert_eq!(clone.doc_no, "D-101");
        assert_eq!(clone.revision, 4);
        assert_eq!(clone.status, DocumentStatus::Active);
        assert_eq!(clone.sheet_size, "A1");
    }
}
