//! Restore command - recover an obsolete project

use clap::Args;
use miette::{miette, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{confirm, open_store, parse_project_id, resolve_actor};
use crate::core::actor::RequestMeta;
use crate::core::status::ProjectStatus;
use crate::services::RestoreService;

/// Restore an obsolete project to a chosen status
#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Project id
    pub project: String,

    /// Target status, e.g. draft or approved
    #[arg(long)]
    pub to: String,

    /// Reason for the restore
    #[arg(long, short = 'm', default_value = "")]
    pub message: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl RestoreArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let project_id = parse_project_id(&self.project)?;
        let target: ProjectStatus = self.to.parse().map_err(|e: String| miette!(e))?;

        if !confirm(&format!("Restore this project to {}?", target), self.yes)? {
            println!("Aborted.");
            return Ok(());
        }

        let mut service = RestoreService::new(&mut store);
        service
            .restore_project(&project_id, &actor, target, &self.message, &RequestMeta::cli())
            .map_err(|err| miette!("{err}"))?;

        println!("Project restored to {}.", target);
        Ok(())
    }
}
