use crate::models::UserRow;
use crate::{Database, DbError};
use rusqlite::{OptionalExtension, Row};

impl Database {
    // -- Users --

    /// Insert a new user. Fails with [`DbError::DuplicateUsername`] when the
    /// username is taken; the check is the column's UNIQUE constraint, so
    /// two concurrent registrations cannot both succeed.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )
            .map_err(map_unique_violation)?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password, created_at FROM users WHERE username = ?1",
                    [username],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn count_users(&self) -> Result<u64, DbError> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(n as u64)
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_unique_violation(err: rusqlite::Error) -> DbError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DbError::DuplicateUsername
        }
        other => DbError::Sqlite(other),
    }
}
