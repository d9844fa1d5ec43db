//! Templated email notifier
//!
//! Renders plain-text bodies from the embedded templates and hands the
//! finished message to a [`MailTransport`]. The transport is the only
//! pluggable piece: swapping in an HTTP or SMTP sender is a pure
//! substitution behind the trait.

use rust_embed::RustEmbed;
use tera::Tera;

use crate::core::config::Config;
use crate::entities::{Project, User};

use super::{EventContext, EventKind, Notifier};

#[derive(RustEmbed)]
#[folder = "templates/emails"]
struct EmailTemplates;

/// A fully rendered outgoing message
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

/// Delivery mechanism for rendered emails
pub trait MailTransport {
    /// Deliver one message. Implementations report failure rather than
    /// panicking.
    fn send(&self, email: &OutgoingEmail) -> bool;
}

/// Transport that writes messages to the log instead of sending them.
/// The default for CLI use, where no mail provider is configured.
#[derive(Debug, Default)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn send(&self, email: &OutgoingEmail) -> bool {
        tracing::info!(
            to = %email.to_email,
            subject = %email.subject,
            "email notification (log transport)"
        );
        tracing::debug!(body = %email.body);
        true
    }
}

/// Notifier that renders templated emails and pushes them to a transport
pub struct EmailNotifier<T: MailTransport> {
    tera: Tera,
    config: Config,
    transport: T,
}

impl<T: MailTransport> EmailNotifier<T> {
    pub fn new(config: Config, transport: T) -> Self {
        let mut tera = Tera::default();
        for name in EmailTemplates::iter() {
            let Some(file) = EmailTemplates::get(&name) else {
                continue;
            };
            let contents = String::from_utf8_lossy(&file.data).into_owned();
            if let Err(err) = tera.add_raw_template(&name, &contents) {
                tracing::error!(template = %name, %err, "failed to register email template");
            }
        }
        Self {
            tera,
            config,
            transport,
        }
    }

    fn subject(&self, event: EventKind, project: Option<&Project>) -> String {
        let label = |p: &Project| format!("{} {}", p.name, p.version_display());
        match (event, project) {
            (EventKind::Submitted, Some(p)) => format!("Project Submitted: {}", label(p)),
            (EventKind::Approved, Some(p)) => format!("Project Approved: {}", label(p)),
            (EventKind::Rejected, Some(p)) => format!("Project Rejected: {}", label(p)),
            (EventKind::RevisionRequested, Some(p)) => {
                format!("Revision Required: {}", label(p))
            }
            (EventKind::Obsoleted, Some(p)) => format!("Project Obsolete: {}", p.name),
            (EventKind::AdminNewSubmission, Some(p)) => {
                format!("New Project Submission: {}", label(p))
            }
            (EventKind::AdminResubmission, Some(p)) => {
                format!("Project Resubmitted: {}", label(p))
            }
            (EventKind::AccountSetup, _) => {
                format!("Welcome to {} - Set Up Your Account", self.config.company_name)
            }
            (EventKind::PasswordReset, _) => {
                format!("{} Password Reset", self.config.company_name)
            }
            // Project events without a project should not happen; degrade
            // to a generic subject rather than failing delivery.
            (_, None) => format!("{} Notification", self.config.company_name),
        }
    }

    fn render_body(
        &self,
        event: EventKind,
        project: Option<&Project>,
        recipient: &User,
        actor: Option<&User>,
        ctx: &EventContext,
    ) -> tera::Result<String> {
        let mut context = tera::Context::new();
        context.insert("user_name", recipient.display_name());
        context.insert("company_name", &self.config.company_name);
        if let Some(project) = project {
            context.insert("project_name", &project.name);
            context.insert("project_version", &project.version_display());
            context.insert(
                "project_url",
                &format!("{}/projects/{}/", self.config.frontend_url, project.id),
            );
        }
        if let Some(actor) = actor {
            context.insert("actor_name", actor.display_name());
        }
        if let Some(comments) = &ctx.comments {
            context.insert("comments", comments);
        }
        if let Some(receipt_id) = &ctx.receipt_id {
            context.insert("receipt_id", receipt_id);
        }
        if let Some(setup_url) = &ctx.setup_url {
            context.insert("setup_url", setup_url);
        }
        if let Some(temp_password) = &ctx.temp_password {
            context.insert("temp_password", temp_password);
        }

        self.tera
            .render(&format!("{}.txt", event.template_name()), &context)
    }
}

impl<T: MailTransport> Notifier for EmailNotifier<T> {
    fn notify(
        &self,
        event: EventKind,
        project: Option<&Project>,
        recipient: &User,
        actor: Option<&User>,
        ctx: &EventContext,
    ) -> bool {
        if recipient.email.trim().is_empty() {
            tracing::warn!(user = %recipient.username, "recipient has no email address");
            return false;
        }

        let body = match self.render_body(event, project, recipient, actor, ctx) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(?event, %err, "email template rendering failed");
                return false;
            }
        };

        let email = OutgoingEmail {
            to_email: recipient.email.clone(),
            to_name: recipient.display_name().to_string(),
            subject: self.subject(event, project),
            body,
        };

        let delivered = self.transport.send(&email);
        if !delivered {
            tracing::error!(to = %email.to_email, subject = %email.subject, "email delivery failed");
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actor::Role;
    use crate::core::identity::{GroupId, UserId};
    use std::cell::RefCell;

    /// Transport that captures messages for assertions
    #[derive(Default)]
    struct CaptureTransport {
        sent: RefCell<Vec<OutgoingEmail>>,
    }

    impl MailTransport for CaptureTransport {
        fn send(&self, email: &OutgoingEmail) -> bool {
            self.sent.borrow_mut().push(email.clone());
            true
        }
    }

    fn sample_project(owner: UserId) -> Project {
        let mut project = Project::first_version(GroupId::new(), "Pump House", "", owner);
        project.version = 2;
        project
    }

    #[test]
    fn test_all_event_templates_render() {
        let notifier = EmailNotifier::new(Config::default(), CaptureTransport::default());
        let user = User::new("jsmith", "jsmith@example.com", Role::Submitter);
        let project = sample_project(user.id);
        let ctx = EventContext {
            comments: Some("Please fix title block".to_string()),
            receipt_id: Some("RCT-01ABC".to_string()),
            setup_url: Some("https://docuhub.local/setup".to_string()),
            temp_password: Some("changeme-now".to_string()),
        };

        for event in [
            EventKind::Submitted,
            EventKind::Approved,
            EventKind::Rejected,
            EventKind::RevisionRequested,
            EventKind::Obsoleted,
            EventKind::AdminNewSubmission,
            EventKind::AdminResubmission,
        ] {
            assert!(
                notifier.notify(event, Some(&project), &user, None, &ctx),
                "{event:?} failed to deliver"
            );
        }
        for event in [EventKind::AccountSetup, EventKind::PasswordReset] {
            assert!(notifier.notify(event, None, &user, None, &ctx));
        }

        let sent = notifier.transport.sent.borrow();
        assert_eq!(sent.len(), 9);
        assert!(sent[0].subject.contains("Pump House V002"));
        assert!(sent[0].body.contains("Pump House"));
    }

    #[test]
    fn test_missing_email_reports_failure() {
        let notifier = EmailNotifier::new(Config::default(), CaptureTransport::default());
        let mut user = User::new("jsmith", "", Role::Submitter);
        user.email = String::new();
        let project = sample_project(user.id);

        assert!(!notifier.notify(
            EventKind::Approved,
            Some(&project),
            &user,
            None,
            &EventContext::default(),
        ));
        assert!(notifier.transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_revision_body_includes_comments() {
        let notifier = EmailNotifier::new(Config::default(), CaptureTransport::default());
        let user = User::new("jsmith", "jsmith@example.com", Role::Submitter);
        let project = sample_project(user.id);
        let ctx = EventContext {
            comments: Some("Sheet 3 is missing the north arrow".to_string()),
            ..EventContext::default()
        };

        assert!(notifier.notify(
            EventKind::RevisionRequested,
            Some(&project),
            &user,
            None,
            &ctx
        ));
        let sent = notifier.transport.sent.borrow();
        assert!(sent[0].body.contains("north arrow"));
    }
}
