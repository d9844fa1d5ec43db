//! Output formatting utilities

use console::style;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::core::status::ProjectStatus;
use crate::entities::{Project, User};
use crate::store::Store;

use super::helpers::username_of;

/// Render any set of rows as the standard table
pub fn table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

#[derive(Tabled)]
pub struct ProjectRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "VER")]
    pub version: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "PRIORITY")]
    pub priority: String,
    #[tabled(rename = "SUBMITTED BY")]
    pub submitted_by: String,
}

impl ProjectRow {
    pub fn from_project(store: &Store, project: &Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name.clone(),
            version: project.version_display(),
            status: styled_status(project.status),
            priority: project.priority.to_string(),
            submitted_by: username_of(store, &project.submitted_by),
        }
    }
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "USERNAME")]
    pub username: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "EMAIL")]
    pub email: String,
    #[tabled(rename = "ROLE")]
    pub role: String,
    #[tabled(rename = "ACTIVE")]
    pub active: String,
}

impl UserRow {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.display_name().to_string(),
            email: user.email.clone(),
            role: user.role.to_string(),
            active: if user.is_active { "yes" } else { "no" }.to_string(),
        }
    }
}

/// Status with a colour cue for terminals
pub fn styled_status(status: ProjectStatus) -> String {
    let label = status.to_string();
    match status {
        ProjectStatus::Approved => style(label).green().to_string(),
        ProjectStatus::Rejected => style(label).red().to_string(),
        ProjectStatus::PendingApproval => style(label).yellow().to_string(),
        ProjectStatus::Obsolete | ProjectStatus::Rescinded => {
            style(label).dim().to_string()
        }
        _ => label,
    }
}
