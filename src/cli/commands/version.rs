//! Version command - cut a new version from a predecessor

use clap::Args;
use miette::{miette, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, parse_project_id, resolve_actor};
use crate::core::actor::RequestMeta;
use crate::services::VersionService;

/// Create a new version of a project
#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Project id of the predecessor version
    pub project: String,

    /// Notes explaining the revision
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl VersionArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let project_id = parse_project_id(&self.project)?;

        let mut service = VersionService::new(&mut store);
        let new_project = service
            .create_new_version(&project_id, &actor, &self.notes, &RequestMeta::cli())
            .map_err(|err| miette!("{err}"))?;

        println!(
            "Created {} of {} (draft)",
            new_project.version_display(),
            new_project.name
        );
        println!("  {}", new_project.id);
        Ok(())
    }
}
