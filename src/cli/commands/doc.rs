//! Doc command - document register management

use clap::{Args, Subcommand};
use miette::{miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, parse_project_id, resolve_actor};
use crate::core::identity::DocumentId;
use crate::core::status::Discipline;
use crate::services::{NewDocumentInput, ProjectService};
use crate::store::documents;

#[derive(Debug, Subcommand)]
pub enum DocCommand {
    /// Register a document on a draft project
    Add(DocAddArgs),
    /// List a project's documents
    List(DocListArgs),
    /// Retire a document from the active register
    Remove(DocRemoveArgs),
}

impl DocCommand {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        match self {
            DocCommand::Add(args) => args.run(global),
            DocCommand::List(args) => args.run(global),
            DocCommand::Remove(args) => args.run(global),
        }
    }
}

#[derive(Debug, Args)]
pub struct DocAddArgs {
    /// Project id
    pub project: String,

    /// Document number (unique per project, upper-cased)
    #[arg(long)]
    pub number: String,

    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Discipline: architectural, structural, mechanical, electrical,
    /// plumbing, civil, other
    #[arg(long, default_value = "other")]
    pub discipline: String,

    /// Drawing type, e.g. plan, section
    #[arg(long = "type", default_value = "")]
    pub doc_type: String,

    /// Link to the drawing file or register entry
    #[arg(long, default_value = "")]
    pub link: String,

    #[arg(long, default_value = "")]
    pub scale: String,

    #[arg(long, default_value = "")]
    pub sheet_size: String,

    #[arg(long, default_value_t = 0)]
    pub sort_order: i64,
}

impl DocAddArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let project_id = parse_project_id(&self.project)?;
        let discipline: Discipline = self.discipline.parse().map_err(|e: String| miette!(e))?;

        let mut service = ProjectService::new(&mut store);
        let document = service
            .add_document(
                &actor,
                &project_id,
                NewDocumentInput {
                    doc_no: self.number.clone(),
                    title: self.title.clone(),
                    description: self.description.clone(),
                    discipline,
                    doc_type: self.doc_type.clone(),
                    file_link: self.link.clone(),
                    scale_ratio: self.scale.clone(),
                    sheet_size: self.sheet_size.clone(),
                    sort_order: self.sort_order,
                },
            )
            .map_err(|err| miette!("{err}"))?;

        println!("Registered {} ({})", document.doc_no, document.id);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct DocListArgs {
    /// Project id
    pub project: String,

    /// Include inactive documents
    #[arg(long)]
    pub all: bool,
}

impl DocListArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let store = open_store(global)?;
        let project_id = parse_project_id(&self.project)?;

        let docs = if self.all {
            documents::all_for_project(store.conn(), &project_id).into_diagnostic()?
        } else {
            documents::active_for_project(store.conn(), &project_id).into_diagnostic()?
        };

        for doc in &docs {
            println!(
                "{}  rev {}  [{}]  {}  {}",
                doc.doc_no,
                doc.revision,
                doc.status,
                doc.discipline,
                if doc.title.is_empty() {
                    &doc.description
                } else {
                    &doc.title
                }
            );
        }
        println!("{} document(s)", docs.len());
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct DocRemoveArgs {
    /// Document id
    pub id: String,
}

impl DocRemoveArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let id: DocumentId = self
            .id
            .parse()
            .map_err(|err| miette!("Invalid document id '{}': {}", self.id, err))?;

        let mut service = ProjectService::new(&mut store);
        service
            .remove_document(&actor, &id)
            .map_err(|err| miette!("{err}"))?;

        println!("Retired document {}", id);
        Ok(())
    }
}
