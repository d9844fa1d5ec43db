//! SQLite serialization for typed enums and ids
//!
//! Implements ToSql and FromSql for the status/role enums and the prefixed
//! id newtypes so rows read and write with their domain types directly.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::core::actor::Role;
use crate::core::identity::{DocumentId, GroupId, ProjectId, UserId};
use crate::core::status::{ApprovalAction, Discipline, DocumentStatus, Priority, ProjectStatus};

fn parse_error(e: impl std::fmt::Display) -> FromSqlError {
    FromSqlError::Other(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        e.to_string(),
    )))
}

macro_rules! sql_via_string {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.to_string()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                s.parse().map_err(parse_error)
            }
        }
    };
}

sql_via_string!(ProjectStatus);
sql_via_string!(DocumentStatus);
sql_via_string!(Priority);
sql_via_string!(Discipline);
sql_via_string!(ApprovalAction);
sql_via_string!(Role);

sql_via_string!(GroupId);
sql_via_string!(ProjectId);
sql_via_string!(DocumentId);
sql_via_string!(UserId);
