//! Project group queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::core::identity::GroupId;
use crate::entities::ProjectGroup;

fn from_row(row: &Row) -> rusqlite::Result<ProjectGroup> {
    Ok(ProjectGroup {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        client: row.get("client")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert(conn: &Connection, group: &ProjectGroup) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO project_groups (id, code, name, client, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            group.id,
            group.code,
            group.name,
            group.client,
            group.created_by,
            group.created_at,
            group.updated_at,
        ],
    )?;
    Ok(())
}

pub fn by_id(conn: &Connection, id: &GroupId) -> rusqlite::Result<Option<ProjectGroup>> {
    conn.query_row("SELECT * FROM project_groups WHERE id = ?1", [id], from_row)
        .optional()
}

pub fn by_code(conn: &Connection, code: &str) -> rusqlite::Result<Option<ProjectGroup>> {
    conn.query_row(
        "SELECT * FROM project_groups WHERE code = ?1",
        [code],
        from_row,
    )
    .optional()
}

/// Next sequential human code, e.g. `PG-0007`
pub fn next_code(conn: &Connection) -> rusqlite::Result<String> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM project_groups", [], |row| row.get(0))?;
    Ok(format!("PG-{:04}", count + 1))
}
