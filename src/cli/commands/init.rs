//! Init command - create the database and the first administrator

use clap::Args;
use miette::{bail, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::open_store;
use crate::core::actor::Role;
use crate::core::config::Config;
use crate::entities::User;
use crate::store::users;

/// Initialize the database
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Username for the bootstrap administrator account
    #[arg(long, default_value = "admin")]
    pub admin_username: String,

    /// Email for the bootstrap administrator account
    #[arg(long, default_value = "admin@example.com")]
    pub admin_email: String,
}

impl InitArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let store = open_store(global)?;

        if users::by_username(store.conn(), &self.admin_username)
            .into_diagnostic()?
            .is_some()
        {
            bail!("Database already initialized (user {} exists)", self.admin_username);
        }

        let mut admin = User::new(&self.admin_username, &self.admin_email, Role::Admin);
        admin.is_staff = true;
        admin.is_superuser = true;
        users::insert(store.conn(), &admin).into_diagnostic()?;

        let config = Config::load();
        println!(
            "Initialized DocuHub database at {}",
            config.database_path(global.db.clone()).display()
        );
        println!("Administrator account: {}", self.admin_username);
        Ok(())
    }
}
