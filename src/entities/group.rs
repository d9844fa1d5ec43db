//! Project group entity - a family of project versions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{GroupId, UserId};

/// A logical project family
///
/// Groups are never deleted; they accumulate versions for as long as the
/// project lives. The human code is unique and stable across versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGroup {
    pub id: GroupId,

    /// Short human code, e.g. `PG-0042`
    pub code: String,

    pub name: String,

    /// Client or department the project is delivered for
    #[serde(default)]
    pub client: String,

    pub created_by: UserId,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ProjectGroup {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        client: impl Into<String>,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            code: code.into(),
            name: name.into(),
            client: client.into(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
