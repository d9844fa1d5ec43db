//! Notification collaborator
//!
//! Services hand completed state changes to a [`Notifier`]; delivery is
//! best-effort. A notifier must never panic and must never fail the
//! business transaction that already committed: problems are logged and
//! reported as `false`.

pub mod email;

use std::cell::RefCell;

use crate::entities::{Project, User};

pub use email::{EmailNotifier, LogTransport, MailTransport, OutgoingEmail};

/// Kinds of events the workflow emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Submitted,
    Approved,
    Rejected,
    RevisionRequested,
    Obsoleted,
    AdminNewSubmission,
    AdminResubmission,
    AccountSetup,
    PasswordReset,
}

impl EventKind {
    /// Template stem for the event's email body
    pub fn template_name(self) -> &'static str {
        match self {
            EventKind::Submitted => "project_submitted",
            EventKind::Approved => "project_approved",
            EventKind::Rejected => "project_rejected",
            EventKind::RevisionRequested => "revision_required",
            EventKind::Obsoleted => "project_obsolete",
            EventKind::AdminNewSubmission => "admin_new_submission",
            EventKind::AdminResubmission => "admin_resubmission",
            EventKind::AccountSetup => "account_setup",
            EventKind::PasswordReset => "password_reset",
        }
    }
}

/// Extra context carried alongside an event
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    /// Reviewer or revision comments, when the action carried any
    pub comments: Option<String>,
    /// Submission receipt identifier
    pub receipt_id: Option<String>,
    /// Account-setup link for provisioning emails
    pub setup_url: Option<String>,
    /// One-time password for reset emails
    pub temp_password: Option<String>,
}

/// Collaborator that delivers workflow notifications
pub trait Notifier {
    /// Deliver one notification. Returns whether delivery succeeded; must
    /// not panic. Account events carry no project.
    fn notify(
        &self,
        event: EventKind,
        project: Option<&Project>,
        recipient: &User,
        actor: Option<&User>,
        ctx: &EventContext,
    ) -> bool;
}

/// A delivered (recorded) event, kept by [`RecordingNotifier`]
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub event: EventKind,
    pub project_name: Option<String>,
    pub project_version: Option<u32>,
    pub recipient: String,
    pub comments: Option<String>,
}

/// Notifier that records events in memory instead of delivering them.
/// Used by tests and as a quiet stand-in where no transport is configured.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: RefCell<Vec<RecordedEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.event == kind).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        event: EventKind,
        project: Option<&Project>,
        recipient: &User,
        _actor: Option<&User>,
        ctx: &EventContext,
    ) -> bool {
        self.events.borrow_mut().push(RecordedEvent {
            event,
            project_name: project.map(|p| p.name.clone()),
            project_version: project.map(|p| p.version),
            recipient: recipient.username.clone(),
            comments: ctx.comments.clone(),
        });
        true
    }
}
