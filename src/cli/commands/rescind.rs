//! Rescind command - withdraw an approved project

use clap::Args;
use miette::{miette, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{confirm, notifier, open_store, parse_project_id, resolve_actor};
use crate::core::actor::RequestMeta;
use crate::services::SubmissionService;

/// Rescind an approved project
#[derive(Debug, Args)]
pub struct RescindArgs {
    /// Project id
    pub project: String,

    /// Reason for rescinding (required)
    #[arg(long, short = 'm')]
    pub message: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl RescindArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let project_id = parse_project_id(&self.project)?;

        if !confirm("Rescind this project's approval?", self.yes)? {
            println!("Aborted.");
            return Ok(());
        }

        let notifier = notifier();
        let mut service = SubmissionService::new(&mut store, &notifier);
        service
            .rescind_project(&project_id, &actor, &self.message, &RequestMeta::cli())
            .map_err(|err| miette!("{err}"))?;

        println!("Project rescinded.");
        Ok(())
    }
}
