//! Shared helpers for CLI commands

use miette::{bail, miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::core::actor::Actor;
use crate::core::config::Config;
use crate::core::identity::{ProjectId, UserId};
use crate::entities::User;
use crate::notify::{EmailNotifier, LogTransport};
use crate::store::{users, Store};

/// Open the store at the configured database location
pub fn open_store(global: &GlobalOpts) -> Result<Store> {
    let config = Config::load();
    let path = config.database_path(global.db.clone());
    Store::open(&path)
        .map_err(|err| miette!("Cannot open database at {}: {}", path.display(), err))
}

/// Build the notifier used by CLI-driven service calls
pub fn notifier() -> EmailNotifier<LogTransport> {
    EmailNotifier::new(Config::load(), LogTransport)
}

/// Resolve the acting account from `--as` / `DOCUHUB_USER`
pub fn resolve_actor(store: &Store, global: &GlobalOpts) -> Result<(Actor, User)> {
    let Some(username) = &global.acting_user else {
        bail!("No acting user. Pass --as <username> or set DOCUHUB_USER");
    };
    let user = users::by_username(store.conn(), username)
        .into_diagnostic()?
        .ok_or_else(|| miette!("Unknown user: {}", username))?;
    if !user.is_active {
        bail!("User {} is deactivated", username);
    }
    Ok((user.actor(), user))
}

/// Parse a project id argument
pub fn parse_project_id(raw: &str) -> Result<ProjectId> {
    raw.parse()
        .map_err(|err| miette!("Invalid project id '{}': {}", raw, err))
}

/// Resolve a user id to its username, falling back to the raw id
pub fn username_of(store: &Store, id: &UserId) -> String {
    users::by_id(store.conn(), id)
        .ok()
        .flatten()
        .map(|u| u.username)
        .unwrap_or_else(|| id.to_string())
}

/// Ask for confirmation unless `-y` was passed
pub fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}
