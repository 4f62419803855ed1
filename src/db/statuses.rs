//! Status CRUD operations.

use super::Database;
use crate::error::StorageResult;
use crate::types::{RowId, Status};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

impl Database {
    /// Insert a validated status and return its new id.
    pub fn insert_status(&self, status: &Status) -> StorageResult<RowId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO status (description) VALUES (?1)",
                params![status.description()],
            )?;
            let id = conn.last_insert_rowid();
            debug!(id, description = %status.description(), "Inserted status");
            Ok(id)
        })
    }

    pub fn get_all_statuses(&self) -> StorageResult<Vec<Status>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, description FROM status ORDER BY rowid")?;
            let statuses = stmt
                .query_map([], |row| Ok(Status::from_row(row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(statuses)
        })
    }

    pub fn get_last_status(&self) -> StorageResult<Option<Status>> {
        self.with_conn(|conn| {
            let status = conn
                .query_row(
                    "SELECT id, description FROM status ORDER BY id DESC LIMIT 1",
                    [],
                    |row| Ok(Status::from_row(row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(status)
        })
    }

    /// Resolve a status description to its id.
    pub fn find_status_id(&self, description: &str) -> StorageResult<Option<RowId>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM status WHERE description = ?1",
                    params![description],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    pub fn get_status_names(&self) -> StorageResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT description FROM status ORDER BY id ASC")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }
}
