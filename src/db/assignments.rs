//! Assignment operations and the joined assignment view.
//!
//! Reads return [`AssignmentRow`]s: the three foreign keys are replaced by
//! the employee's full name, the task name and the status description.

use super::Database;
use super::employees::FULL_NAME_SQL;
use crate::error::StorageResult;
use crate::types::{Assignment, AssignmentRow, AssignmentSelection, ForeignKey, RowId};
use rusqlite::{OptionalExtension, Row, params};
use std::sync::LazyLock;
use tracing::debug;

static JOINED_SELECT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT assignment.id, {} AS employee, task.name AS task, status.description AS status
         FROM assignment
         JOIN employee ON assignment.emp_id = employee.id
         JOIN task ON assignment.task_id = task.id
         JOIN status ON assignment.status_id = status.id",
        FULL_NAME_SQL
    )
});

fn parse_assignment_row(row: &Row) -> rusqlite::Result<AssignmentRow> {
    Ok(AssignmentRow {
        id: row.get("id")?,
        employee: row.get("employee")?,
        task: row.get("task")?,
        status: row.get("status")?,
    })
}

impl Database {
    /// Insert an assignment and return its new id.
    ///
    /// Fails with a constraint error if any key does not reference an existing row.
    pub fn insert_assignment(&self, assignment: &Assignment) -> StorageResult<RowId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO assignment (emp_id, task_id, status_id) VALUES (?1, ?2, ?3)",
                params![
                    assignment.employee_id(),
                    assignment.task_id(),
                    assignment.status_id()
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(
                id,
                employee_id = assignment.employee_id(),
                task_id = assignment.task_id(),
                status_id = assignment.status_id(),
                "Inserted assignment"
            );
            Ok(id)
        })
    }

    /// Every assignment, joined against its employee, task and status.
    pub fn get_all_assignments(&self) -> StorageResult<Vec<AssignmentRow>> {
        self.query_assignments(&format!("{} ORDER BY assignment.id", *JOINED_SELECT), &[])
    }

    /// The most recently inserted assignment, joined.
    pub fn get_last_assignment(&self) -> StorageResult<Option<AssignmentRow>> {
        let rows = self.query_assignments(
            &format!("{} ORDER BY assignment.id DESC LIMIT 1", *JOINED_SELECT),
            &[],
        )?;
        Ok(rows.into_iter().next())
    }

    /// Assignments whose employee full name equals `full_name` exactly.
    pub fn filter_assignments_by_employee(
        &self,
        full_name: &str,
    ) -> StorageResult<Vec<AssignmentRow>> {
        self.query_assignments(
            &format!(
                "{} WHERE {} = ?1 ORDER BY assignment.id",
                *JOINED_SELECT, FULL_NAME_SQL
            ),
            &[&full_name],
        )
    }

    /// Assignments whose status description equals `description` exactly.
    pub fn filter_assignments_by_status(
        &self,
        description: &str,
    ) -> StorageResult<Vec<AssignmentRow>> {
        self.query_assignments(
            &format!(
                "{} WHERE status.description = ?1 ORDER BY assignment.id",
                *JOINED_SELECT
            ),
            &[&description],
        )
    }

    fn query_assignments(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> StorageResult<Vec<AssignmentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map(params, parse_assignment_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// All assignment ids, ascending.
    pub fn get_assignment_ids(&self) -> StorageResult<Vec<RowId>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id FROM assignment ORDER BY id ASC")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<RowId>, _>>()?;
            Ok(ids)
        })
    }

    /// One foreign key of an assignment, or `None` if the assignment does not exist.
    pub fn get_foreign_key_from_assignment(
        &self,
        assignment_id: RowId,
        which: ForeignKey,
    ) -> StorageResult<Option<RowId>> {
        self.with_conn(|conn| {
            // Column name comes from a closed enum, never from input.
            let id = conn
                .query_row(
                    &format!("SELECT {} FROM assignment WHERE id = ?1", which.column()),
                    params![assignment_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    /// All three foreign keys of an assignment at once.
    pub fn get_assignment_selection(
        &self,
        assignment_id: RowId,
    ) -> StorageResult<Option<AssignmentSelection>> {
        self.with_conn(|conn| {
            let selection = conn
                .query_row(
                    "SELECT id, emp_id, task_id, status_id FROM assignment WHERE id = ?1",
                    params![assignment_id],
                    |row| {
                        Ok(AssignmentSelection {
                            assignment_id: row.get(0)?,
                            employee_id: row.get(1)?,
                            task_id: row.get(2)?,
                            status_id: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(selection)
        })
    }

    /// Replace all three foreign keys of an assignment.
    ///
    /// Returns `false` when no assignment has that id.
    pub fn update_assignment(
        &self,
        assignment_id: RowId,
        employee_id: RowId,
        task_id: RowId,
        status_id: RowId,
    ) -> StorageResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE assignment SET emp_id = ?1, task_id = ?2, status_id = ?3 WHERE id = ?4",
                params![employee_id, task_id, status_id, assignment_id],
            )?;
            debug!(assignment_id, changed, "Updated assignment");
            Ok(changed > 0)
        })
    }
}
