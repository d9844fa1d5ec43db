//! Actor identity passed into every service call
//!
//! Services never reach into an ambient "current user"; the caller resolves
//! the acting account up front and hands an [`Actor`] down. Role and staff
//! flags are always present, so permission checks never traverse optional
//! chains.

use serde::{Deserialize, Serialize};

use crate::core::identity::UserId;

/// Application role held by a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Can review and decide submissions
    Approver,
    /// Can create and submit own projects
    #[default]
    Submitter,
    /// Read-only access to approved projects
    Viewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Approver => write!(f, "approver"),
            Role::Submitter => write!(f, "submitter"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "approver" => Ok(Role::Approver),
            "submitter" => Ok(Role::Submitter),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The acting account for a service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

impl Actor {
    /// Build an actor with the given role and no elevated flags
    pub fn with_role(id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            is_staff: false,
            is_superuser: false,
            is_active: true,
        }
    }
}

/// Request metadata attached verbatim to approval trail rows
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Metadata for actions performed through the CLI
    pub fn cli() -> Self {
        Self {
            ip_address: None,
            user_agent: Some(format!("docuhub-cli/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Admin, Role::Approver, Role::Submitter, Role::Viewer] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert_eq!("APPROVER".parse::<Role>(), Ok(Role::Approver));
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_role_is_submitter() {
        assert_eq!(Role::default(), Role::Submitter);
    }

    #[test]
    fn test_cli_meta_carries_user_agent() {
        let meta = RequestMeta::cli();
        assert!(meta.ip_address.is_none());
        assert!(meta.user_agent.unwrap().starts_with("docuhub-cli/"));
    }
}
