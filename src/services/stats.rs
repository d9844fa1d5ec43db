//! Project statistics and reporting

use rusqlite::params;

use crate::core::identity::{GroupId, UserId};
use crate::core::status::ProjectStatus;
use crate::entities::Project;
use crate::store::{projects, Store};

use super::WorkflowError;

/// Per-user project counts by status
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserProjectStats {
    pub total: u32,
    pub draft: u32,
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
    pub revision_requested: u32,
    pub obsolete: u32,
}

/// Counts backing the review dashboard
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AdminDashboard {
    pub pending_approvals: u32,
    pub total_projects: u32,
    pub approved_today: u32,
    pub rejected_today: u32,
}

/// Version statistics for one project group
#[derive(Debug, Clone)]
pub struct GroupStats {
    pub total_versions: u32,
    pub approved_versions: u32,
    pub latest_version: Option<Project>,
}

/// Read-only statistics over the project store
pub struct ProjectStatsService<'a> {
    store: &'a Store,
}

impl<'a> ProjectStatsService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Status breakdown of one user's projects
    pub fn user_stats(&self, user_id: &UserId) -> Result<UserProjectStats, WorkflowError> {
        let mut stats = UserProjectStats::default();
        let mut stmt = self.store.conn().prepare(
            "SELECT status, COUNT(*) FROM projects WHERE submitted_by = ?1 GROUP BY status",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok((row.get::<_, ProjectStatus>(0)?, row.get::<_, u32>(1)?))
        })?;
        for row in rows {
            let (status, count) = row?;
            stats.total += count;
            match status {
                ProjectStatus::Draft => stats.draft += count,
                ProjectStatus::PendingApproval => stats.pending += count,
                ProjectStatus::Approved => stats.approved += count,
                ProjectStatus::Rejected => stats.rejected += count,
                ProjectStatus::RevisionRequested => stats.revision_requested += count,
                ProjectStatus::Obsolete => stats.obsolete += count,
                ProjectStatus::Rescinded => {}
            }
        }
        Ok(stats)
    }

    /// Counts for the administrative dashboard
    pub fn admin_dashboard(&self) -> Result<AdminDashboard, WorkflowError> {
        let conn = self.store.conn();
        let count = |sql: &str, status: ProjectStatus| -> rusqlite::Result<u32> {
            conn.query_row(sql, params![&status], |row| row.get(0))
        };

        Ok(AdminDashboard {
            pending_approvals: count(
                "SELECT COUNT(*) FROM projects WHERE status = ?1",
                ProjectStatus::PendingApproval,
            )?,
            total_projects: conn.query_row("SELECT COUNT(*) FROM projects", [], |row| {
                row.get(0)
            })?,
            approved_today: count(
                "SELECT COUNT(*) FROM projects
                 WHERE status = ?1 AND date(date_reviewed) = date('now')",
                ProjectStatus::Approved,
            )?,
            rejected_today: count(
                "SELECT COUNT(*) FROM projects
                 WHERE status = ?1 AND date(date_reviewed) = date('now')",
                ProjectStatus::Rejected,
            )?,
        })
    }

    /// Version statistics for a group
    pub fn group_stats(&self, group_id: &GroupId) -> Result<GroupStats, WorkflowError> {
        let conn = self.store.conn();
        let total_versions: u32 = conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE group_id = ?1",
            [group_id],
            |row| row.get(0),
        )?;
        let approved_versions: u32 = conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE group_id = ?1 AND status = ?2",
            params![group_id, &ProjectStatus::Approved],
            |row| row.get(0),
        )?;
        Ok(GroupStats {
            total_versions,
            approved_versions,
            latest_version: projects::latest_in_group(conn, group_id)?,
        })
    }
}
