//! User account service
//!
//! Account provisioning and role management. Profile fields are written in
//! the same transaction that creates the account, so every user has a
//! complete profile from the moment it exists; there are no implicit
//! creation hooks.

use chrono::Utc;

use crate::core::actor::{Actor, Role};
use crate::core::permissions::is_project_administrator;
use crate::entities::User;
use crate::notify::{EventContext, EventKind, Notifier};
use crate::store::{users, Store};

use super::WorkflowError;

/// Input for provisioning a user account
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub department: String,
    pub phone: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Service for user account management operations
pub struct UserAccountService<'a> {
    store: &'a mut Store,
    notifier: &'a dyn Notifier,
}

impl<'a> UserAccountService<'a> {
    pub fn new(store: &'a mut Store, notifier: &'a dyn Notifier) -> Self {
        Self { store, notifier }
    }

    /// Create a user account with its profile, then send the setup email.
    pub fn create_user(
        &mut self,
        actor: &Actor,
        input: NewUser,
        setup_url: Option<String>,
    ) -> Result<User, WorkflowError> {
        if !is_project_administrator(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "create user accounts",
            });
        }

        let tx = self.store.immediate_tx()?;
        if users::by_username(&tx, &input.username)?.is_some() {
            return Err(WorkflowError::DuplicateUsername {
                username: input.username,
            });
        }

        let mut user = User::new(input.username, input.email, input.role);
        user.display_name = input.display_name;
        user.department = input.department;
        user.phone = input.phone;
        user.is_staff = input.is_staff;
        user.is_superuser = input.is_superuser;
        users::insert(&tx, &user)?;
        tx.commit()?;

        tracing::info!(user = %user.username, actor = %actor.username, "user account created");

        let ctx = EventContext {
            setup_url,
            ..EventContext::default()
        };
        self.notifier
            .notify(EventKind::AccountSetup, None, &user, None, &ctx);

        Ok(user)
    }

    /// Change a user's role.
    pub fn set_role(
        &mut self,
        actor: &Actor,
        username: &str,
        role: Role,
    ) -> Result<User, WorkflowError> {
        self.update_account(actor, username, "change roles", |user| user.role = role)
    }

    /// Activate or deactivate an account.
    pub fn set_active(
        &mut self,
        actor: &Actor,
        username: &str,
        active: bool,
    ) -> Result<User, WorkflowError> {
        self.update_account(actor, username, "change account status", |user| {
            user.is_active = active
        })
    }

    fn update_account(
        &mut self,
        actor: &Actor,
        username: &str,
        action: &'static str,
        apply: impl FnOnce(&mut User),
    ) -> Result<User, WorkflowError> {
        if !is_project_administrator(actor) {
            return Err(WorkflowError::NotAuthorized { action });
        }

        let tx = self.store.immediate_tx()?;
        let mut user =
            users::by_username(&tx, username)?.ok_or_else(|| WorkflowError::UnknownUser {
                username: username.to_string(),
            })?;
        if user.id == actor.id {
            return Err(WorkflowError::CannotModifySelf);
        }

        apply(&mut user);
        user.updated_at = Utc::now();
        users::update(&tx, &user)?;
        tx.commit()?;

        tracing::info!(user = %user.username, actor = %actor.username, "user account updated");
        Ok(user)
    }

    /// Send a password-reset notification carrying a temporary password.
    pub fn request_password_reset(
        &mut self,
        actor: &Actor,
        username: &str,
        temp_password: &str,
    ) -> Result<bool, WorkflowError> {
        let user =
            users::by_username(self.store.conn(), username)?.ok_or_else(|| {
                WorkflowError::UnknownUser {
                    username: username.to_string(),
                }
            })?;
        if user.id != actor.id && !is_project_administrator(actor) {
            return Err(WorkflowError::NotAuthorized {
                action: "reset this user's password",
            });
        }

        let ctx = EventContext {
            temp_password: Some(temp_password.to_string()),
            ..EventContext::default()
        };
        Ok(self
            .notifier
            .notify(EventKind::PasswordReset, None, &user, None, &ctx))
    }
}
