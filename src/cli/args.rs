//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::commands;

/// DocuHub - drawing submission and approval workflow
#[derive(Debug, Parser)]
#[command(name = "docuhub", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the database file
    #[arg(long, global = true, env = "DOCUHUB_DB")]
    pub db: Option<PathBuf>,

    /// Username to act as
    #[arg(long = "as", global = true, env = "DOCUHUB_USER", value_name = "USERNAME")]
    pub acting_user: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize the database (and the first administrator account)
    Init(commands::init::InitArgs),

    /// Manage user accounts
    #[command(subcommand)]
    User(commands::user::UserCommand),

    /// Manage projects
    #[command(subcommand)]
    Project(commands::project::ProjectCommand),

    /// Manage a project's document register
    #[command(subcommand)]
    Doc(commands::doc::DocCommand),

    /// Submit a project for approval
    Submit(commands::submit::SubmitArgs),

    /// Approve pending projects
    Approve(commands::review::ApproveArgs),

    /// Reject pending projects
    Reject(commands::review::RejectArgs),

    /// Request revisions on pending projects
    Revise(commands::review::ReviseArgs),

    /// List projects waiting for review
    Review(commands::review::ReviewListArgs),

    /// Create a new version of a project
    Version(commands::version::VersionArgs),

    /// Rescind an approved project
    Rescind(commands::rescind::RescindArgs),

    /// Restore an obsolete project
    Restore(commands::restore::RestoreArgs),

    /// Show a project's audit trail and submissions
    History(commands::history::HistoryArgs),

    /// Show project statistics
    Stats(commands::stats::StatsArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
