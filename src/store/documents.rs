//! Document (drawing) queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::core::identity::{DocumentId, ProjectId};
use crate::core::status::DocumentStatus;
use crate::entities::Document;

fn from_row(row: &Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        doc_no: row.get("doc_no")?,
        title: row.get("title")?,
        description: row.get("description")?,
        discipline: row.get("discipline")?,
        doc_type: row.get("doc_type")?,
        file_link: row.get("file_link")?,
        scale_ratio: row.get("scale_ratio")?,
        sheet_size: row.get("sheet_size")?,
        revision: row.get("revision")?,
        status: row.get("status")?,
        sort_order: row.get("sort_order")?,
        added_by: row.get("added_by")?,
        added_at: row.get("added_at")?,
    })
}

pub fn insert(conn: &Connection, document: &Document) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO documents (id, project_id, doc_no, title, description, discipline, doc_type,
                                file_link, scale_ratio, sheet_size, revision, status, sort_order,
                                added_by, added_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            document.id,
            document.project_id,
            document.doc_no,
            document.title,
            document.description,
            document.discipline,
            document.doc_type,
            document.file_link,
            document.scale_ratio,
            document.sheet_size,
            document.revision,
            document.status,
            document.sort_order,
            document.added_by,
            document.added_at,
        ],
    )?;
    Ok(())
}

pub fn by_id(conn: &Connection, id: &DocumentId) -> rusqlite::Result<Option<Document>> {
    conn.query_row("SELECT * FROM documents WHERE id = ?1", [id], from_row)
        .optional()
}

/// Active documents of a project, register order
pub fn active_for_project(
    conn: &Connection,
    project_id: &ProjectId,
) -> rusqlite::Result<Vec<Document>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM documents WHERE project_id = ?1 AND status = 'active'
         ORDER BY sort_order, doc_no",
    )?;
    let rows = stmt.query_map([project_id], from_row)?;
    rows.collect()
}

/// All documents of a project regardless of status
pub fn all_for_project(
    conn: &Connection,
    project_id: &ProjectId,
) -> rusqlite::Result<Vec<Document>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM documents WHERE project_id = ?1 ORDER BY sort_order, doc_no",
    )?;
    let rows = stmt.query_map([project_id], from_row)?;
    rows.collect()
}

pub fn active_count(conn: &Connection, project_id: &ProjectId) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE project_id = ?1 AND status = 'active'",
        [project_id],
        |row| row.get(0),
    )
}

/// Whether the project already has an active document with this number
pub fn has_active_doc_no(
    conn: &Connection,
    project_id: &ProjectId,
    doc_no: &str,
) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents
         WHERE project_id = ?1 AND doc_no = ?2 AND status = 'active'",
        params![project_id, doc_no],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn set_status(
    conn: &Connection,
    id: &DocumentId,
    status: DocumentStatus,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE documents SET status = ?2 WHERE id = ?1",
        params![id, &status],
    )?;
    Ok(())
}
