//! Review commands - approve, reject, revise, and the pending queue

use clap::Args;
use miette::{bail, miette, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{confirm, notifier, open_store, parse_project_id, resolve_actor};
use crate::cli::output::{table, ProjectRow};
use crate::core::actor::RequestMeta;
use crate::core::identity::ProjectId;
use crate::core::permissions::is_project_manager;
use crate::core::status::ProjectStatus;
use crate::services::{BulkOutcome, BulkReviewService, ProjectStatsService, SubmissionService};
use crate::store::projects;

fn parse_ids(raw: &[String]) -> Result<Vec<ProjectId>> {
    raw.iter().map(|s| parse_project_id(s)).collect()
}

fn print_outcome(outcome: &BulkOutcome) {
    for name in &outcome.success {
        println!("  ok: {}", name);
    }
    for error in &outcome.errors {
        eprintln!("  failed: {}", error);
    }
    println!(
        "{} succeeded, {} failed",
        outcome.success.len(),
        outcome.errors.len()
    );
}

/// Approve pending projects
#[derive(Debug, Args)]
pub struct ApproveArgs {
    /// Project ids (one or more)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Review comment
    #[arg(long, short = 'm', default_value = "")]
    pub message: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl ApproveArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let ids = parse_ids(&self.ids)?;

        if !confirm(&format!("Approve {} project(s)?", ids.len()), self.yes)? {
            println!("Aborted.");
            return Ok(());
        }

        let notifier = notifier();
        if let [id] = ids.as_slice() {
            let mut service = SubmissionService::new(&mut store, &notifier);
            service
                .approve_project(id, &actor, &self.message, &RequestMeta::cli())
                .map_err(|err| miette!("{err}"))?;
            println!("Project approved.");
        } else {
            let mut service = BulkReviewService::new(&mut store, &notifier);
            let outcome = service
                .bulk_approve(&ids, &actor, &self.message, &RequestMeta::cli())
                .map_err(|err| miette!("{err}"))?;
            print_outcome(&outcome);
        }
        Ok(())
    }
}

/// Reject pending projects
#[derive(Debug, Args)]
pub struct RejectArgs {
    /// Project ids (one or more)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Rejection reason (required)
    #[arg(long, short = 'm')]
    pub message: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl RejectArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let ids = parse_ids(&self.ids)?;

        if !confirm(&format!("Reject {} project(s)?", ids.len()), self.yes)? {
            println!("Aborted.");
            return Ok(());
        }

        let notifier = notifier();
        if let [id] = ids.as_slice() {
            let mut service = SubmissionService::new(&mut store, &notifier);
            service
                .reject_project(id, &actor, &self.message, &RequestMeta::cli())
                .map_err(|err| miette!("{err}"))?;
            println!("Project rejected.");
        } else {
            let mut service = BulkReviewService::new(&mut store, &notifier);
            let outcome = service
                .bulk_reject(&ids, &actor, &self.message, &RequestMeta::cli())
                .map_err(|err| miette!("{err}"))?;
            print_outcome(&outcome);
        }
        Ok(())
    }
}

/// Request revisions on pending projects
#[derive(Debug, Args)]
pub struct ReviseArgs {
    /// Project ids (one or more)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Requested changes (required)
    #[arg(long, short = 'm')]
    pub message: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl ReviseArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let ids = parse_ids(&self.ids)?;

        if !confirm(
            &format!("Request revisions on {} project(s)?", ids.len()),
            self.yes,
        )? {
            println!("Aborted.");
            return Ok(());
        }

        let notifier = notifier();
        if let [id] = ids.as_slice() {
            let mut service = SubmissionService::new(&mut store, &notifier);
            service
                .request_revision(id, &actor, &self.message, &RequestMeta::cli())
                .map_err(|err| miette!("{err}"))?;
            println!("Revision requested.");
        } else {
            let mut service = BulkReviewService::new(&mut store, &notifier);
            let outcome = service
                .bulk_request_revision(&ids, &actor, &self.message, &RequestMeta::cli())
                .map_err(|err| miette!("{err}"))?;
            print_outcome(&outcome);
        }
        Ok(())
    }
}

/// List projects waiting for review
#[derive(Debug, Args)]
pub struct ReviewListArgs {}

impl ReviewListArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        if !is_project_manager(&actor) {
            bail!("Not authorized to view the review queue");
        }

        let pending = projects::with_status(store.conn(), ProjectStatus::PendingApproval)
            .map_err(|err| miette!("{err}"))?;
        let rows: Vec<ProjectRow> = pending
            .iter()
            .map(|p| ProjectRow::from_project(&store, p))
            .collect();
        println!("{}", table(rows));

        let stats = ProjectStatsService::new(&store)
            .admin_dashboard()
            .map_err(|err| miette!("{err}"))?;
        println!(
            "{} pending | {} total | {} approved today | {} rejected today",
            stats.pending_approvals,
            stats.total_projects,
            stats.approved_today,
            stats.rejected_today
        );
        Ok(())
    }
}
