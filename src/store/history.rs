//! Approval trail and submission record queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::core::identity::ProjectId;
use crate::core::status::ProjectStatus;
use crate::entities::{ApprovalEvent, SubmissionRecord};

fn event_from_row(row: &Row) -> rusqlite::Result<ApprovalEvent> {
    Ok(ApprovalEvent {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        document_id: row.get("document_id")?,
        version: row.get("version")?,
        action: row.get("action")?,
        previous_status: row.get("previous_status")?,
        new_status: row.get("new_status")?,
        performed_by: row.get("performed_by")?,
        performed_at: row.get("performed_at")?,
        comments: row.get("comments")?,
        ip_address: row.get("ip_address")?,
        user_agent: row.get("user_agent")?,
    })
}

fn submission_from_row(row: &Row) -> rusqlite::Result<SubmissionRecord> {
    Ok(SubmissionRecord {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        version: row.get("version")?,
        submitted_by: row.get("submitted_by")?,
        date_submitted: row.get("date_submitted")?,
        submission_link: row.get("submission_link")?,
        document_count: row.get("document_count")?,
        document_numbers: row.get("document_numbers")?,
        receipt_id: row.get("receipt_id")?,
        approval_status: row.get("approval_status")?,
    })
}

/// Append one approval trail row, returning its row id
pub fn append(conn: &Connection, event: &ApprovalEvent) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO approval_history (project_id, document_id, version, action, previous_status,
                                       new_status, performed_by, performed_at, comments,
                                       ip_address, user_agent)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            event.project_id,
            event.document_id,
            event.version,
            event.action,
            event.previous_status,
            event.new_status,
            event.performed_by,
            event.performed_at,
            event.comments,
            event.ip_address,
            event.user_agent,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Trail rows for a project, newest first
pub fn for_project(conn: &Connection, project_id: &ProjectId) -> rusqlite::Result<Vec<ApprovalEvent>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM approval_history WHERE project_id = ?1
         ORDER BY performed_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([project_id], event_from_row)?;
    rows.collect()
}

/// Insert a submission snapshot, returning its row id
pub fn insert_submission(conn: &Connection, record: &SubmissionRecord) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO submissions (project_id, version, submitted_by, date_submitted,
                                  submission_link, document_count, document_numbers,
                                  receipt_id, approval_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.project_id,
            record.version,
            record.submitted_by,
            record.date_submitted,
            record.submission_link,
            record.document_count,
            record.document_numbers,
            record.receipt_id,
            record.approval_status,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Submission snapshots for a project, newest first
pub fn submissions_for_project(
    conn: &Connection,
    project_id: &ProjectId,
) -> rusqlite::Result<Vec<SubmissionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM submissions WHERE project_id = ?1
         ORDER BY date_submitted DESC, id DESC",
    )?;
    let rows = stmt.query_map([project_id], submission_from_row)?;
    rows.collect()
}

/// Most recent submission snapshot for a specific version of a project
pub fn latest_submission(
    conn: &Connection,
    project_id: &ProjectId,
    version: u32,
) -> rusqlite::Result<Option<SubmissionRecord>> {
    conn.query_row(
        "SELECT * FROM submissions WHERE project_id = ?1 AND version = ?2
         ORDER BY date_submitted DESC, id DESC LIMIT 1",
        params![project_id, version],
        submission_from_row,
    )
    .optional()
}

/// Update the review status on a version's submission snapshots.
/// Returns the number of rows touched (zero when the version was never
/// formally submitted).
pub fn set_submission_status(
    conn: &Connection,
    project_id: &ProjectId,
    version: u32,
    status: ProjectStatus,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE submissions SET approval_status = ?3 WHERE project_id = ?1 AND version = ?2",
        params![project_id, version, &status],
    )
}
