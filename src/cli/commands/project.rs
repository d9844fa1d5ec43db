//! Project command - create, list, show, edit

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use miette::{bail, miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, parse_project_id, resolve_actor, username_of};
use crate::cli::output::{styled_status, table, ProjectRow};
use crate::core::actor::RequestMeta;
use crate::core::permissions::can_view_project;
use crate::core::status::{Priority, ProjectStatus};
use crate::services::{NewProjectInput, ProjectService, ProjectStatsService, ProjectUpdate};
use crate::store::{documents, groups, projects};

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a project (a new group with version 1 in draft)
    New(ProjectNewArgs),
    /// List projects visible to the acting user
    List(ProjectListArgs),
    /// Show one project with its document register
    Show(ProjectShowArgs),
    /// Edit a draft project
    Edit(ProjectEditArgs),
}

impl ProjectCommand {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        match self {
            ProjectCommand::New(args) => args.run(global),
            ProjectCommand::List(args) => args.run(global),
            ProjectCommand::Show(args) => args.run(global),
            ProjectCommand::Edit(args) => args.run(global),
        }
    }
}

#[derive(Debug, Args)]
pub struct ProjectNewArgs {
    /// Project name
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Client or department
    #[arg(long, default_value = "")]
    pub client: String,

    /// Group code; generated when omitted
    #[arg(long)]
    pub code: Option<String>,

    /// Priority: low, normal, high, urgent
    #[arg(long, default_value = "normal")]
    pub priority: String,

    /// Deadline date (YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Option<NaiveDate>,
}

impl ProjectNewArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let priority: Priority = self.priority.parse().map_err(|e: String| miette!(e))?;

        let mut service = ProjectService::new(&mut store);
        let (group, project) = service
            .create_project(
                &actor,
                NewProjectInput {
                    name: self.name.clone(),
                    description: self.description.clone(),
                    client: self.client.clone(),
                    code: self.code.clone(),
                    priority,
                    deadline: self.deadline,
                },
                &RequestMeta::cli(),
            )
            .map_err(|err| miette!("{err}"))?;

        println!("Created project {} [{}]", project.name, group.code);
        println!("  {}  {}", project.id, project.version_display());
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ProjectListArgs {
    /// Only projects in this status
    #[arg(long)]
    pub status: Option<String>,

    /// Only the acting user's own projects
    #[arg(long)]
    pub mine: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ProjectListArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let status = match &self.status {
            Some(raw) => Some(raw.parse::<ProjectStatus>().map_err(|e| miette!(e))?),
            None => None,
        };

        let service = ProjectService::new(&mut store);
        let mut visible = service
            .visible_projects(&actor)
            .map_err(|err| miette!("{err}"))?;
        if let Some(status) = status {
            visible.retain(|p| p.status == status);
        }
        if self.mine {
            visible.retain(|p| p.submitted_by == actor.id);
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&visible).into_diagnostic()?
            );
            return Ok(());
        }

        let rows: Vec<ProjectRow> = visible
            .iter()
            .map(|p| ProjectRow::from_project(&store, p))
            .collect();
        println!("{}", table(rows));
        println!("{} project(s)", visible.len());
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ProjectShowArgs {
    /// Project id
    pub id: String,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ProjectShowArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let id = parse_project_id(&self.id)?;

        let project = projects::by_id(store.conn(), &id)
            .into_diagnostic()?
            .ok_or_else(|| miette!("Project not found: {}", id))?;
        if !can_view_project(&actor, &project) {
            bail!("Not authorized to view this project");
        }

        let group = groups::by_id(store.conn(), &project.group_id).into_diagnostic()?;
        let docs = documents::all_for_project(store.conn(), &project.id).into_diagnostic()?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "project": project,
                    "group": group,
                    "documents": docs,
                }))
                .into_diagnostic()?
            );
            return Ok(());
        }

        let stats = ProjectStatsService::new(&store)
            .group_stats(&project.group_id)
            .map_err(|err| miette!("{err}"))?;

        println!("{}  {}", project.name, project.version_display());
        if let Some(group) = &group {
            println!("  Group:     {} ({})", group.code, group.client);
        }
        println!(
            "  Versions:  {} ({} approved)",
            stats.total_versions, stats.approved_versions
        );
        println!("  Status:    {}", styled_status(project.status));
        println!("  Priority:  {}", project.priority);
        println!("  Latest:    {}", if project.is_latest { "yes" } else { "no" });
        println!("  Submitter: {}", username_of(&store, &project.submitted_by));
        if let Some(deadline) = project.deadline {
            println!("  Deadline:  {}", deadline);
        }
        if !project.revision_notes.is_empty() {
            println!("  Revision notes: {}", project.revision_notes);
        }
        if !project.review_comments.is_empty() {
            println!("  Review comments: {}", project.review_comments);
        }

        println!("\nDocuments ({}):", docs.len());
        for doc in &docs {
            println!(
                "  {}  rev {}  [{}]  {}",
                doc.doc_no,
                doc.revision,
                doc.status,
                if doc.title.is_empty() {
                    &doc.description
                } else {
                    &doc.title
                }
            );
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ProjectEditArgs {
    /// Project id
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Priority: low, normal, high, urgent
    #[arg(long)]
    pub priority: Option<String>,

    /// Deadline date (YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Option<NaiveDate>,
}

impl ProjectEditArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let id = parse_project_id(&self.id)?;
        let priority = match &self.priority {
            Some(raw) => Some(raw.parse::<Priority>().map_err(|e| miette!(e))?),
            None => None,
        };

        let mut service = ProjectService::new(&mut store);
        let project = service
            .update_project(
                &actor,
                &id,
                ProjectUpdate {
                    name: self.name.clone(),
                    description: self.description.clone(),
                    priority,
                    deadline: self.deadline,
                },
            )
            .map_err(|err| miette!("{err}"))?;

        println!("Updated {} {}", project.name, project.version_display());
        Ok(())
    }
}
