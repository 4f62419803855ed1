//! Task CRUD operations.

use super::Database;
use crate::error::StorageResult;
use crate::types::{RowId, Task};
use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: RowId = row.get("id")?;
    let name: String = row.get("name")?;
    let description: String = row.get("description")?;
    let price: f64 = row.get("price")?;
    let hours: f64 = row.get("hours")?;

    Ok(Task::from_row(id, name, description, price, hours))
}

impl Database {
    /// Insert a validated task and return its new id.
    pub fn insert_task(&self, task: &Task) -> StorageResult<RowId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO task (name, description, price, hours) VALUES (?1, ?2, ?3, ?4)",
                params![task.name(), task.description(), task.price(), task.hours()],
            )?;
            let id = conn.last_insert_rowid();
            debug!(id, name = %task.name(), "Inserted task");
            Ok(id)
        })
    }

    pub fn get_all_tasks(&self) -> StorageResult<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, description, price, hours FROM task ORDER BY rowid")?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
    }

    pub fn get_last_task(&self) -> StorageResult<Option<Task>> {
        self.with_conn(|conn| {
            let task = conn
                .query_row(
                    "SELECT id, name, description, price, hours FROM task ORDER BY id DESC LIMIT 1",
                    [],
                    parse_task_row,
                )
                .optional()?;
            Ok(task)
        })
    }

    /// Resolve a task name to its id.
    pub fn find_task_id(&self, name: &str) -> StorageResult<Option<RowId>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM task WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    pub fn get_task_names(&self) -> StorageResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM task ORDER BY id ASC")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }
}
