//! Project version queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::core::identity::{GroupId, ProjectId, UserId};
use crate::core::status::ProjectStatus;
use crate::entities::Project;

fn from_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        group_id: row.get("group_id")?,
        version: row.get("version")?,
        is_latest: row.get("is_latest")?,
        name: row.get("name")?,
        description: row.get("description")?,
        status: row.get("status")?,
        priority: row.get("priority")?,
        deadline: row.get("deadline")?,
        revision_notes: row.get("revision_notes")?,
        submitted_by: row.get("submitted_by")?,
        date_submitted: row.get("date_submitted")?,
        date_reviewed: row.get("date_reviewed")?,
        reviewed_by: row.get("reviewed_by")?,
        review_comments: row.get("review_comments")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Insert a project as its group's latest version.
///
/// The latest flag is cleared on all siblings first, inside the caller's
/// transaction, so the partial unique index never sees two flags at once.
pub fn insert_as_latest(conn: &Connection, project: &Project) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE projects SET is_latest = 0 WHERE group_id = ?1 AND is_latest = 1",
        [&project.group_id],
    )?;
    conn.execute(
        "INSERT INTO projects (id, group_id, version, is_latest, name, description, status,
                               priority, deadline, revision_notes, submitted_by, date_submitted,
                               date_reviewed, reviewed_by, review_comments, created_at, updated_at)
         VALUES (?1, ?2, ?3, 1, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            project.id,
            project.group_id,
            project.version,
            project.name,
            project.description,
            project.status,
            project.priority,
            project.deadline,
            project.revision_notes,
            project.submitted_by,
            project.date_submitted,
            project.date_reviewed,
            project.reviewed_by,
            project.review_comments,
            project.created_at,
            project.updated_at,
        ],
    )?;
    Ok(())
}

/// Persist mutable project fields (status, stamps, review outcome, flags)
pub fn update(conn: &Connection, project: &Project) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE projects
         SET is_latest = ?2, name = ?3, description = ?4, status = ?5, priority = ?6,
             deadline = ?7, revision_notes = ?8, date_submitted = ?9, date_reviewed = ?10,
             reviewed_by = ?11, review_comments = ?12, updated_at = ?13
         WHERE id = ?1",
        params![
            project.id,
            project.is_latest,
            project.name,
            project.description,
            project.status,
            project.priority,
            project.deadline,
            project.revision_notes,
            project.date_submitted,
            project.date_reviewed,
            project.reviewed_by,
            project.review_comments,
            project.updated_at,
        ],
    )?;
    Ok(())
}

pub fn by_id(conn: &Connection, id: &ProjectId) -> rusqlite::Result<Option<Project>> {
    conn.query_row("SELECT * FROM projects WHERE id = ?1", [id], from_row)
        .optional()
}

/// All versions in a group, newest first
pub fn in_group(conn: &Connection, group_id: &GroupId) -> rusqlite::Result<Vec<Project>> {
    let mut stmt =
        conn.prepare("SELECT * FROM projects WHERE group_id = ?1 ORDER BY version DESC")?;
    let rows = stmt.query_map([group_id], from_row)?;
    rows.collect()
}

pub fn latest_in_group(conn: &Connection, group_id: &GroupId) -> rusqlite::Result<Option<Project>> {
    conn.query_row(
        "SELECT * FROM projects WHERE group_id = ?1 ORDER BY version DESC LIMIT 1",
        [group_id],
        from_row,
    )
    .optional()
}

/// Highest version number allocated in a group, if any
pub fn max_version(conn: &Connection, group_id: &GroupId) -> rusqlite::Result<Option<u32>> {
    conn.query_row(
        "SELECT MAX(version) FROM projects WHERE group_id = ?1",
        [group_id],
        |row| row.get::<_, Option<u32>>(0),
    )
}

/// The highest Approved version below `version` in the group, if any.
/// Used by approval to obsolete the predecessor it supersedes.
pub fn approved_predecessor(
    conn: &Connection,
    group_id: &GroupId,
    version: u32,
) -> rusqlite::Result<Option<Project>> {
    conn.query_row(
        "SELECT * FROM projects
         WHERE group_id = ?1 AND version < ?2 AND status = 'approved'
         ORDER BY version DESC LIMIT 1",
        params![group_id, version],
        from_row,
    )
    .optional()
}

/// Projects matching a status, newest first
pub fn with_status(conn: &Connection, status: ProjectStatus) -> rusqlite::Result<Vec<Project>> {
    let mut stmt =
        conn.prepare("SELECT * FROM projects WHERE status = ?1 ORDER BY created_at DESC")?;
    let rows = stmt.query_map([&status], from_row)?;
    rows.collect()
}

/// All projects, newest first
pub fn all(conn: &Connection) -> rusqlite::Result<Vec<Project>> {
    let mut stmt = conn.prepare("SELECT * FROM projects ORDER BY created_at DESC")?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

/// Whether the user already has a non-obsolete project with this name
/// (case-insensitive).
pub fn name_exists_for_user(
    conn: &Connection,
    user_id: &UserId,
    name: &str,
) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM projects
         WHERE submitted_by = ?1 AND name = ?2 COLLATE NOCASE AND status != 'obsolete'",
        params![user_id, name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Subset of the given ids currently in the given status.
///
/// Bulk review actions use this to silently drop items that are no longer
/// pending rather than failing the batch.
pub fn ids_with_status(
    conn: &Connection,
    ids: &[ProjectId],
    status: ProjectStatus,
) -> rusqlite::Result<Vec<Project>> {
    let mut out = Vec::new();
    let mut stmt = conn.prepare("SELECT * FROM projects WHERE id = ?1 AND status = ?2")?;
    for id in ids {
        if let Some(project) = stmt.query_row(params![id, &status], from_row).optional()? {
            out.push(project);
        }
    }
    Ok(out)
}
