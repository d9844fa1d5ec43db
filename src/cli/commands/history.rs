//! History command - audit trail and submission log

use std::path::PathBuf;

use clap::Args;
use miette::{bail, miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, parse_project_id, resolve_actor, username_of};
use crate::core::permissions::can_view_project;
use crate::store::{history, projects};

/// Show a project's audit trail and submissions
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Project id
    pub project: String,

    /// Show the submission log instead of the approval trail
    #[arg(long)]
    pub submissions: bool,

    /// Export the submission log as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl HistoryArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let project_id = parse_project_id(&self.project)?;

        let project = projects::by_id(store.conn(), &project_id)
            .into_diagnostic()?
            .ok_or_else(|| miette!("Project not found: {}", project_id))?;
        if !can_view_project(&actor, &project) {
            bail!("Not authorized to view this project");
        }

        if let Some(path) = &self.csv {
            return self.export_csv(&store, &project_id, path);
        }

        if self.submissions {
            let records =
                history::submissions_for_project(store.conn(), &project_id).into_diagnostic()?;
            for record in &records {
                println!(
                    "{}  V{:03}  {}  {} document(s)  [{}]",
                    record.date_submitted.format("%Y-%m-%d %H:%M"),
                    record.version,
                    record.receipt_id,
                    record.document_count,
                    record.approval_status
                );
            }
            println!("{} submission(s)", records.len());
            return Ok(());
        }

        let trail = history::for_project(store.conn(), &project_id).into_diagnostic()?;
        for event in &trail {
            let transition = match (event.previous_status, event.new_status) {
                (Some(from), Some(to)) => format!("{} -> {}", from, to),
                (None, Some(to)) => format!("-> {}", to),
                _ => String::new(),
            };
            println!(
                "{}  V{:03}  {:<16}  {:<32}  by {}",
                event.performed_at.format("%Y-%m-%d %H:%M"),
                event.version,
                event.action.to_string(),
                transition,
                username_of(&store, &event.performed_by)
            );
            if !event.comments.is_empty() {
                println!("    {}", event.comments);
            }
        }
        println!("{} event(s)", trail.len());
        Ok(())
    }

    fn export_csv(
        &self,
        store: &crate::store::Store,
        project_id: &crate::core::identity::ProjectId,
        path: &PathBuf,
    ) -> Result<()> {
        let records =
            history::submissions_for_project(store.conn(), project_id).into_diagnostic()?;

        let mut writer = csv::Writer::from_path(path).into_diagnostic()?;
        writer
            .write_record([
                "receipt_id",
                "version",
                "submitted_by",
                "date_submitted",
                "document_count",
                "document_numbers",
                "approval_status",
            ])
            .into_diagnostic()?;
        for record in &records {
            writer
                .write_record([
                    record.receipt_id.as_str(),
                    &record.version.to_string(),
                    &username_of(store, &record.submitted_by),
                    &record.date_submitted.to_rfc3339(),
                    &record.document_count.to_string(),
                    record.document_numbers.as_str(),
                    &record.approval_status.to_string(),
                ])
                .into_diagnostic()?;
        }
        writer.flush().into_diagnostic()?;

        println!("Wrote {} submission(s) to {}", records.len(), path.display());
        Ok(())
    }
}
