//! Stats command - project statistics

use clap::Args;
use miette::{bail, miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, resolve_actor};
use crate::core::permissions::is_project_manager;
use crate::services::ProjectStatsService;
use crate::store::users;

/// Show project statistics
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Show stats for this user instead of the acting user
    #[arg(long)]
    pub user: Option<String>,

    /// Show the administrative dashboard counts
    #[arg(long)]
    pub dashboard: bool,
}

impl StatsArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let store = open_store(global)?;
        let (actor, acting_user) = resolve_actor(&store, global)?;
        let service = ProjectStatsService::new(&store);

        if self.dashboard {
            if !is_project_manager(&actor) {
                bail!("Not authorized to view the dashboard");
            }
            let dashboard = service.admin_dashboard().map_err(|err| miette!("{err}"))?;
            println!("Pending approvals: {}", dashboard.pending_approvals);
            println!("Total projects:    {}", dashboard.total_projects);
            println!("Approved today:    {}", dashboard.approved_today);
            println!("Rejected today:    {}", dashboard.rejected_today);
            return Ok(());
        }

        let target = match &self.user {
            Some(username) => {
                if username != &actor.username && !is_project_manager(&actor) {
                    bail!("Not authorized to view other users' stats");
                }
                users::by_username(store.conn(), username)
                    .into_diagnostic()?
                    .ok_or_else(|| miette!("Unknown user: {}", username))?
            }
            None => acting_user,
        };

        let stats = service
            .user_stats(&target.id)
            .map_err(|err| miette!("{err}"))?;
        println!("Projects for {}:", target.username);
        println!("  total:              {}", stats.total);
        println!("  draft:              {}", stats.draft);
        println!("  pending approval:   {}", stats.pending);
        println!("  approved:           {}", stats.approved);
        println!("  rejected:           {}", stats.rejected);
        println!("  revision requested: {}", stats.revision_requested);
        println!("  obsolete:           {}", stats.obsolete);
        Ok(())
    }
}
