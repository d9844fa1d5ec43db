//! User command - account management

use clap::{Args, Subcommand};
use miette::{miette, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{notifier, open_store, resolve_actor};
use crate::cli::output::{table, UserRow};
use crate::core::actor::Role;
use crate::services::{NewUser, UserAccountService};
use crate::store::users;

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user account
    Add(UserAddArgs),
    /// List user accounts
    List(UserListArgs),
    /// Change a user's role
    SetRole(SetRoleArgs),
    /// Deactivate a user account
    Deactivate(DeactivateArgs),
    /// Send a password reset with a temporary password
    ResetPassword(ResetPasswordArgs),
}

impl UserCommand {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        match self {
            UserCommand::Add(args) => args.run(global),
            UserCommand::List(args) => args.run(global),
            UserCommand::SetRole(args) => args.run(global),
            UserCommand::Deactivate(args) => args.run(global),
            UserCommand::ResetPassword(args) => args.run(global),
        }
    }
}

#[derive(Debug, Args)]
pub struct UserAddArgs {
    /// Login name
    #[arg(long)]
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Full display name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Role: admin, approver, submitter, viewer
    #[arg(long, default_value = "submitter")]
    pub role: String,

    #[arg(long, default_value = "")]
    pub department: String,

    /// Grant staff access (review rights)
    #[arg(long)]
    pub staff: bool,

    /// Link for the account-setup email
    #[arg(long)]
    pub setup_url: Option<String>,
}

impl UserAddArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let role: Role = self.role.parse().map_err(|e: String| miette!(e))?;

        let notifier = notifier();
        let mut service = UserAccountService::new(&mut store, &notifier);
        let user = service
            .create_user(
                &actor,
                NewUser {
                    username: self.username.clone(),
                    email: self.email.clone(),
                    display_name: self.name.clone(),
                    role,
                    department: self.department.clone(),
                    phone: String::new(),
                    is_staff: self.staff,
                    is_superuser: false,
                },
                self.setup_url.clone(),
            )
            .map_err(|err| miette!("{err}"))?;

        println!("Created user {} ({})", user.username, user.role);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct UserListArgs {}

impl UserListArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let store = open_store(global)?;
        let all = users::all(store.conn()).into_diagnostic()?;
        let rows: Vec<UserRow> = all.iter().map(UserRow::from_user).collect();
        println!("{}", table(rows));
        println!("{} user(s)", all.len());
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct SetRoleArgs {
    /// Target username
    pub username: String,

    /// New role: admin, approver, submitter, viewer
    pub role: String,
}

impl SetRoleArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;
        let role: Role = self.role.parse().map_err(|e: String| miette!(e))?;

        let notifier = notifier();
        let mut service = UserAccountService::new(&mut store, &notifier);
        let user = service
            .set_role(&actor, &self.username, role)
            .map_err(|err| miette!("{err}"))?;

        println!("{} is now {}", user.username, user.role);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct DeactivateArgs {
    /// Target username
    pub username: String,
}

impl DeactivateArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;

        let notifier = notifier();
        let mut service = UserAccountService::new(&mut store, &notifier);
        let user = service
            .set_active(&actor, &self.username, false)
            .map_err(|err| miette!("{err}"))?;

        println!("Deactivated {}", user.username);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Target username
    pub username: String,

    /// Temporary password to send
    #[arg(long)]
    pub temp_password: String,
}

impl ResetPasswordArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let mut store = open_store(global)?;
        let (actor, _) = resolve_actor(&store, global)?;

        let notifier = notifier();
        let mut service = UserAccountService::new(&mut store, &notifier);
        let delivered = service
            .request_password_reset(&actor, &self.username, &self.temp_password)
            .map_err(|err| miette!("{err}"))?;

        if delivered {
            println!("Password reset sent to {}", self.username);
        } else {
            println!("Password reset could not be delivered (see logs)");
        }
        Ok(())
    }
}
