//! Employee CRUD operations.

use super::Database;
use crate::error::StorageResult;
use crate::types::{Employee, RowId};
use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

/// SQL expression for the employee natural key, `"first last"`.
pub(crate) const FULL_NAME_SQL: &str = "(employee.first || ' ' || employee.last)";

pub fn parse_employee_row(row: &Row) -> rusqlite::Result<Employee> {
    let id: RowId = row.get("id")?;
    let first: String = row.get("first")?;
    let last: String = row.get("last")?;
    let phone: Option<String> = row.get("phone")?;
    let email: Option<String> = row.get("email")?;

    Ok(Employee::from_row(
        id,
        first,
        last,
        phone.unwrap_or_default(),
        email.unwrap_or_default(),
    ))
}

impl Database {
    /// Insert a validated employee and return its new id.
    ///
    /// Fails with a constraint error if the (first, last) pair already exists.
    pub fn insert_employee(&self, employee: &Employee) -> StorageResult<RowId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO employee (first, last, phone, email) VALUES (?1, ?2, ?3, ?4)",
                params![
                    employee.first(),
                    employee.last(),
                    employee.phone(),
                    employee.email()
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(id, name = %employee.full_name(), "Inserted employee");
            Ok(id)
        })
    }

    /// All employees in storage order.
    pub fn get_all_employees(&self) -> StorageResult<Vec<Employee>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, first, last, phone, email FROM employee ORDER BY rowid")?;
            let employees = stmt
                .query_map([], parse_employee_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(employees)
        })
    }

    /// The most recently inserted employee.
    pub fn get_last_employee(&self) -> StorageResult<Option<Employee>> {
        self.with_conn(|conn| {
            let employee = conn
                .query_row(
                    "SELECT id, first, last, phone, email FROM employee ORDER BY id DESC LIMIT 1",
                    [],
                    parse_employee_row,
                )
                .optional()?;
            Ok(employee)
        })
    }

    /// Resolve a full name (`"first last"`) to an employee id.
    pub fn find_employee_id(&self, full_name: &str) -> StorageResult<Option<RowId>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    &format!("SELECT id FROM employee WHERE {} = ?1", FULL_NAME_SQL),
                    params![full_name],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    /// Full names of every employee, ordered by id.
    pub fn get_employee_names(&self) -> StorageResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM employee ORDER BY id ASC",
                FULL_NAME_SQL
            ))?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }
}
