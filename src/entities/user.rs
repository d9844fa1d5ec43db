//! User account entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::actor::{Actor, Role};
use crate::core::identity::UserId;

/// A user account with its profile fields
///
/// Profile data (role, department, phone) lives on the account row itself
/// and is written in the same transaction that creates the account, so a
/// user without a profile cannot exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Unique login name (case-insensitive)
    pub username: String,

    pub email: String,

    /// Full display name; falls back to the username when empty
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub department: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub is_staff: bool,

    #[serde(default)]
    pub is_superuser: bool,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active account with the given role
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            display_name: String::new(),
            role,
            department: String::new(),
            phone: String::new(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name to address this user by in output and notifications
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    /// The actor value handed into service calls on behalf of this account
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            is_active: self.is_active,
        }
    }
}
