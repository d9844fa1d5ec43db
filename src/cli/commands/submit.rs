//! Submit command - send a project for approval

use clap::Args;
use miette::{miette, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{notifier, open_store, parse_project_id, resolve_actor};
use crate::core::actor::RequestMeta;
use crate::services::SubmissionService;

/// Submit a project for approval
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Project id
    pub project: String,
}

impl SubmitArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let project_id = parse_project_id(&self.project)?;

        let notifier = notifier();
        let mut service = SubmissionService::new(&mut store, &notifier);
        let record = service
            .submit_for_approval(&project_id, &actor, &RequestMeta::cli())
            .map_err(|err| miette!("{err}"))?;

        println!("Submitted for approval.");
        println!("  Receipt:   {}", record.receipt_id);
        println!("  Documents: {} ({})", record.document_count, record.document_numbers);
        Ok(())
    }
}
