//! Database layer: the single point of contact with the SQLite store.

pub mod assignments;
pub mod employees;
pub mod schema;
pub mod statuses;
pub mod tasks;

use crate::error::{StorageError, StorageResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Tables in drop order: dependents before their referents.
pub const TABLES: [&str; 4] = ["assignment", "status", "task", "employee"];

/// Bookkeeping table maintained by refinery.
const MIGRATION_HISTORY_TABLE: &str = "refinery_schema_history";

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Memory,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Memory => write!(f, ":memory:"),
        }
    }
}

/// Database handle.
///
/// Construct one at startup and pass it to whatever needs the store. The
/// connection is opened on first use and stays open until [`Database::close`].
pub struct Database {
    location: Location,
    conn: Mutex<Option<Connection>>,
}

impl Database {
    /// Handle for the database file at the given path. Nothing is opened yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            conn: Mutex::new(None),
        }
    }

    /// Handle for a private in-memory database (for testing).
    pub fn open_in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: Mutex::new(None),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Close the connection. The next operation reopens it.
    pub fn close(&self) -> StorageResult<()> {
        if let Some(conn) = self.lock().take() {
            conn.close().map_err(|(_, e)| {
                warn!(location = %self.location, error = %e, "Failed to close database");
                StorageError::from(e)
            })?;
            debug!(location = %self.location, "Database connection closed");
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connect(&self) -> StorageResult<Connection> {
        let conn = match &self.location {
            Location::File(path) => Connection::open(path),
            Location::Memory => Connection::open_in_memory(),
        }
        .map_err(|source| StorageError::Open {
            path: self.location.to_string(),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        debug!(location = %self.location, "Database connection opened");
        Ok(conn)
    }

    /// Execute a function with exclusive access to the connection, opening it if needed.
    ///
    /// Failures are logged here, at the boundary, and handed back to the caller.
    pub fn with_conn<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> StorageResult<T>,
    {
        let mut slot = self.lock();
        let result = match slot.take() {
            Some(conn) => Ok(conn),
            None => self.connect(),
        }
        .and_then(|conn| f(slot.insert(conn)));
        if let Err(ref e) = result
            && !e.is_missing_table()
        {
            warn!(location = %self.location, error = %e, "Database operation failed");
        }
        result
    }

    /// Create the four tables if they are absent. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> StorageResult<()> {
        self.with_conn(|conn| {
            let report = embedded::migrations::runner().run(conn)?;
            let applied = report.applied_migrations().len();
            if applied > 0 {
                info!(applied, "Schema created");
            } else {
                debug!("Schema already up to date");
            }
            Ok(())
        })
    }

    /// Drop every table, clearing the whole store.
    pub fn reset_schema(&self) -> StorageResult<()> {
        self.with_conn(|conn| {
            for table in TABLES.iter().chain([&MIGRATION_HISTORY_TABLE]) {
                conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", table))?;
            }
            info!("All tables dropped");
            Ok(())
        })
    }

    /// True when no assignment exists yet, including when the table is missing.
    pub fn is_empty(&self) -> StorageResult<bool> {
        let probe = self.with_conn(|conn| {
            let present: bool = conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM assignment LIMIT 1)",
                [],
                |row| row.get(0),
            )?;
            Ok(!present)
        });

        match probe {
            Err(e) if e.is_missing_table() => {
                debug!("assignment table does not exist yet; treating store as empty");
                Ok(true)
            }
            other => other,
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_opens_lazily() {
        let db = Database::open_in_memory();
        assert!(!db.is_connected());
        db.ensure_schema().unwrap();
        assert!(db.is_connected());
        db.close().unwrap();
        assert!(!db.is_connected());
    }

    #[test]
    fn missing_schema_counts_as_empty() {
        let db = Database::open_in_memory();
        assert!(db.is_empty().unwrap());
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let db = Database::open_in_memory();
        db.ensure_schema().unwrap();
        db.ensure_schema().unwrap();
        assert!(db.is_empty().unwrap());
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let db = Database::open_in_memory();
        let enabled: bool = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert!(enabled);
    }
}
