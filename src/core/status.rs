//! Status and classification enums shared across entity types
//!
//! The workflow status lives on the project version; documents carry a
//! separate activity status. Transition legality mirrors the review
//! pipeline: Draft -> PendingApproval -> {Approved, Rejected,
//! RevisionRequested}, with Obsolete as the terminal state reachable only
//! through version succession, rescinding, or administrative cleanup.

use serde::{Deserialize, Serialize};

/// Workflow status of a project version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ProjectStatus {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    RevisionRequested,
    Rescinded,
    Obsolete,
}

impl ProjectStatus {
    /// Check if a status transition is valid
    pub fn can_transition(self, to: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, to),
            (Draft, PendingApproval)
                | (Draft, Obsolete)
                | (PendingApproval, Approved)
                | (PendingApproval, Rejected)
                | (PendingApproval, RevisionRequested)
                | (Approved, Rescinded)
                | (Approved, Obsolete)
                | (Rejected, Draft)
                | (Rejected, Obsolete)
                | (RevisionRequested, PendingApproval)
                | (RevisionRequested, Draft)
                | (RevisionRequested, Obsolete)
                | (Rescinded, Obsolete)
        )
    }

    /// Get allowed transitions from the current status
    pub fn allowed_transitions(self) -> Vec<ProjectStatus> {
        use ProjectStatus::*;
        match self {
            Draft => vec![PendingApproval, Obsolete],
            PendingApproval => vec![Approved, Rejected, RevisionRequested],
            Approved => vec![Rescinded, Obsolete],
            Rejected => vec![Draft, Obsolete],
            RevisionRequested => vec![PendingApproval, Draft, Obsolete],
            Rescinded => vec![Obsolete],
            Obsolete => vec![],
        }
    }

    /// Statuses a submitter may create a follow-up version from
    pub fn is_versionable(self) -> bool {
        matches!(
            self,
            ProjectStatus::RevisionRequested | ProjectStatus::Approved | ProjectStatus::Rescinded
        )
    }

    /// Statuses the submitter may edit the project in
    pub fn is_editable(self) -> bool {
        matches!(self, ProjectStatus::Draft)
    }

    /// Statuses a project may be submitted for review from
    pub fn is_submittable(self) -> bool {
        matches!(
            self,
            ProjectStatus::Draft | ProjectStatus::RevisionRequested
        )
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Draft => write!(f, "draft"),
            ProjectStatus::PendingApproval => write!(f, "pending_approval"),
            ProjectStatus::Approved => write!(f, "approved"),
            ProjectStatus::Rejected => write!(f, "rejected"),
            ProjectStatus::RevisionRequested => write!(f, "revision_requested"),
            ProjectStatus::Rescinded => write!(f, "rescinded"),
            ProjectStatus::Obsolete => write!(f, "obsolete"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ProjectStatus::Draft),
            "pending_approval" => Ok(ProjectStatus::PendingApproval),
            "approved" => Ok(ProjectStatus::Approved),
            "rejected" => Ok(ProjectStatus::Rejected),
            "revision_requested" => Ok(ProjectStatus::RevisionRequested),
            "rescinded" => Ok(ProjectStatus::Rescinded),
            "obsolete" => Ok(ProjectStatus::Obsolete),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// Activity status of a document within a project version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DocumentStatus {
    #[default]
    Active,
    Inactive,
    Replaced,
    Obsolete,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Active => write!(f, "active"),
            DocumentStatus::Inactive => write!(f, "inactive"),
            DocumentStatus::Replaced => write!(f, "replaced"),
            DocumentStatus::Obsolete => write!(f, "obsolete"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(DocumentStatus::Active),
            "inactive" => Ok(DocumentStatus::Inactive),
            "replaced" => Ok(DocumentStatus::Replaced),
            "obsolete" => Ok(DocumentStatus::Obsolete),
            _ => Err(format!("Unknown document status: {}", s)),
        }
    }
}

/// Priority of a project version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Engineering discipline of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Discipline {
    Architectural,
    Structural,
    Mechanical,
    Electrical,
    Plumbing,
    Civil,
    #[default]
    Other,
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Discipline::Architectural => write!(f, "architectural"),
            Discipline::Structural => write!(f, "structural"),
            Discipline::Mechanical => write!(f, "mechanical"),
            Discipline::Electrical => write!(f, "electrical"),
            Discipline::Plumbing => write!(f, "plumbing"),
            Discipline::Civil => write!(f, "civil"),
            Discipline::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Discipline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "architectural" => Ok(Discipline::Architectural),
            "structural" => Ok(Discipline::Structural),
            "mechanical" => Ok(Discipline::Mechanical),
            "electrical" => Ok(Discipline::Electrical),
            "plumbing" => Ok(Discipline::Plumbing),
            "civil" => Ok(Discipline::Civil),
            "other" => Ok(Discipline::Other),
            _ => Err(format!("Unknown discipline: {}", s)),
        }
    }
}

/// Kind of action recorded in the approval trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Created,
    Submitted,
    Resubmitted,
    Approved,
    Rejected,
    StatusChanged,
    Obsoleted,
    Rescinded,
    VersionCreated,
}

impl std::fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalAction::Created => write!(f, "created"),
            ApprovalAction::Submitted => write!(f, "submitted"),
            ApprovalAction::Resubmitted => write!(f, "resubmitted"),
            ApprovalAction::Approved => write!(f, "approved"),
            ApprovalAction::Rejected => write!(f, "rejected"),
            ApprovalAction::StatusChanged => write!(f, "status_changed"),
            ApprovalAction::Obsoleted => write!(f, "obsoleted"),
            ApprovalAction::Rescinded => write!(f, "rescinded"),
            ApprovalAction::VersionCreated => write!(f, "version_created"),
        }
    }
}

impl std::str::FromStr for ApprovalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(ApprovalAction::Created),
            "submitted" => Ok(ApprovalAction::Submitted),
            "resubmitted" => Ok(ApprovalAction::Resubmitted),
            "approved" => Ok(ApprovalAction::Approved),
            "rejected" => Ok(ApprovalAction::Rejected),
            "status_changed" => Ok(ApprovalAction::StatusChanged),
            "obsoleted" => Ok(ApprovalAction::Obsoleted),
            "rescinded" => Ok(ApprovalAction::Rescinded),
            "version_created" => Ok(ApprovalAction::VersionCreated),
            _ => Err(format!("Unknown approval action: {}", s)),
        }
    }
}
