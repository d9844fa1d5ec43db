//! User account queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::core::identity::UserId;
use crate::entities::User;

fn from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        role: row.get("role")?,
        department: row.get("department")?,
        phone: row.get("phone")?,
        is_staff: row.get("is_staff")?,
        is_superuser: row.get("is_superuser")?,
        is_active: row.get("is_active")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert(conn: &Connection, user: &User) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, email, display_name, role, department, phone,
                            is_staff, is_superuser, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            user.id,
            user.username,
            user.email,
            user.display_name,
            user.role,
            user.department,
            user.phone,
            user.is_staff,
            user.is_superuser,
            user.is_active,
            user.created_at,
            user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, user: &User) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users
         SET email = ?2, display_name = ?3, role = ?4, department = ?5, phone = ?6,
             is_staff = ?7, is_superuser = ?8, is_active = ?9, updated_at = ?10
         WHERE id = ?1",
        params![
            user.id,
            user.email,
            user.display_name,
            user.role,
            user.department,
            user.phone,
            user.is_staff,
            user.is_superuser,
            user.is_active,
            user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn by_id(conn: &Connection, id: &UserId) -> rusqlite::Result<Option<User>> {
    conn.query_row("SELECT * FROM users WHERE id = ?1", [id], from_row)
        .optional()
}

pub fn by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT * FROM users WHERE username = ?1",
        [username],
        from_row,
    )
    .optional()
}

pub fn all(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT * FROM users ORDER BY username")?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

/// Active accounts that receive admin-side submission alerts:
/// staff users plus anyone holding the Admin or Approver role.
pub fn reviewers(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM users
         WHERE is_active = 1 AND (is_staff = 1 OR role IN ('admin', 'approver'))
         ORDER BY username",
    )?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}
