//! SQLite-backed relational store
//!
//! Owns the database connection and schema. Query helpers live in the
//! per-table submodules as free functions over `&Connection`, so they work
//! both on the bare connection and inside a [`rusqlite::Transaction`]
//! (which derefs to one). Services open an IMMEDIATE transaction for every
//! multi-statement mutation; version-number allocation is serialized by
//! that write lock, with the `UNIQUE (group_id, version)` constraint as a
//! backstop.

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use thiserror::Error;

pub mod documents;
pub mod groups;
pub mod history;
pub mod projects;
pub mod serialize;
pub mod users;

#[cfg(test)]
mod tests;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    username      TEXT NOT NULL COLLATE NOCASE UNIQUE,
    email         TEXT NOT NULL,
    display_name  TEXT NOT NULL DEFAULT '',
    role          TEXT NOT NULL DEFAULT 'submitter',
    department    TEXT NOT NULL DEFAULT '',
    phone         TEXT NOT NULL DEFAULT '',
    is_staff      INTEGER NOT NULL DEFAULT 0,
    is_superuser  INTEGER NOT NULL DEFAULT 0,
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS project_groups (
    id          TEXT PRIMARY KEY,
    code        TEXT NOT NULL COLLATE NOCASE UNIQUE,
    name        TEXT NOT NULL,
    client      TEXT NOT NULL DEFAULT '',
    created_by  TEXT NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id               TEXT PRIMARY KEY,
    group_id         TEXT NOT NULL REFERENCES project_groups(id),
    version          INTEGER NOT NULL,
    is_latest        INTEGER NOT NULL DEFAULT 0,
    name             TEXT NOT NULL,
    description      TEXT NOT NULL DEFAULT '',
    status           TEXT NOT NULL DEFAULT 'draft',
    priority         TEXT NOT NULL DEFAULT 'normal',
    deadline         TEXT,
    revision_notes   TEXT NOT NULL DEFAULT '',
    submitted_by     TEXT NOT NULL REFERENCES users(id),
    date_submitted   TEXT,
    date_reviewed    TEXT,
    reviewed_by      TEXT REFERENCES users(id),
    review_comments  TEXT NOT NULL DEFAULT '',
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    UNIQUE (group_id, version)
);

CREATE INDEX IF NOT EXISTS idx_projects_group ON projects(group_id);
CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status);
CREATE INDEX IF NOT EXISTS idx_projects_submitted_by ON projects(submitted_by);
-- Single-latest invariant: at most one latest version per group.
CREATE UNIQUE INDEX IF NOT EXISTS idx_projects_latest
    ON projects(group_id) WHERE is_latest = 1;

CREATE TABLE IF NOT EXISTS documents (
    id           TEXT PRIMARY KEY,
    project_id   TEXT NOT NULL REFERENCES projects(id),
    doc_no       TEXT NOT NULL,
    title        TEXT NOT NULL DEFAULT '',
    description  TEXT NOT NULL DEFAULT '',
    discipline   TEXT NOT NULL DEFAULT 'other',
    doc_type     TEXT NOT NULL DEFAULT '',
    file_link    TEXT NOT NULL DEFAULT '',
    scale_ratio  TEXT NOT NULL DEFAULT '',
    sheet_size   TEXT NOT NULL DEFAULT '',
    revision     INTEGER NOT NULL DEFAULT 0,
    status       TEXT NOT NULL DEFAULT 'active',
    sort_order   INTEGER NOT NULL DEFAULT 0,
    added_by     TEXT NOT NULL REFERENCES users(id),
    added_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_project ON documents(project_id);
-- Document numbers are unique among a project's active documents.
CREATE UNIQUE INDEX IF NOT EXISTS idx_documents_active_no
    ON documents(project_id, doc_no) WHERE status = 'active';

CREATE TABLE IF NOT EXISTS approval_history (
    id               INTEGER PRIMARY KEY,
    project_id       TEXT NOT NULL REFERENCES projects(id),
    document_id      TEXT REFERENCES documents(id),
    version          INTEGER NOT NULL,
    action           TEXT NOT NULL,
    previous_status  TEXT,
    new_status       TEXT,
    performed_by     TEXT NOT NULL REFERENCES users(id),
    performed_at     TEXT NOT NULL,
    comments         TEXT NOT NULL DEFAULT '',
    ip_address       TEXT,
    user_agent       TEXT
);

CREATE INDEX IF NOT EXISTS idx_history_project ON approval_history(project_id);
CREATE INDEX IF NOT EXISTS idx_history_performed_at ON approval_history(performed_at);

CREATE TABLE IF NOT EXISTS submissions (
    id                INTEGER PRIMARY KEY,
    project_id        TEXT NOT NULL REFERENCES projects(id),
    version           INTEGER NOT NULL,
    submitted_by      TEXT NOT NULL REFERENCES users(id),
    date_submitted    TEXT NOT NULL,
    submission_link   TEXT NOT NULL DEFAULT '',
    document_count    INTEGER NOT NULL DEFAULT 0,
    document_numbers  TEXT NOT NULL DEFAULT '',
    receipt_id        TEXT NOT NULL UNIQUE,
    approval_status   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_submissions_project ON submissions(project_id);
"#;

/// Handle to the DocuHub database
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if needed) the database at the given path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (used by tests)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Read-only access to the connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Start a write transaction that takes the database lock up front,
    /// serializing concurrent writers.
    pub fn immediate_tx(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}
