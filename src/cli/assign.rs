//! Assignment subcommands.
//!
//! Assignments are entered by natural key (employee full name, task name,
//! status description) and resolved to ids before they reach the store.

use crate::db::Database;
use crate::error::Error;
use crate::format::{OutputFormat, format_assignments_markdown, format_list_markdown, to_json};
use crate::types::{Assignment, AssignmentRow, ForeignKey, RowId};
use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum AssignArgs {
    /// Assign a task to an employee with a status
    Add {
        /// Employee full name, e.g. "Jane Doe"
        #[arg(long)]
        employee: String,
        /// Task name
        #[arg(long)]
        task: String,
        /// Status description
        #[arg(long)]
        status: String,
    },
    /// Change an assignment; fields not given keep their current value
    Edit {
        id: RowId,
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        task: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// List assignments, optionally filtered by employee or by status
    List {
        /// Only assignments for this employee full name
        #[arg(long, conflicts_with = "status")]
        employee: Option<String>,
        /// Only assignments with this status description
        #[arg(long)]
        status: Option<String>,
    },
    /// List assignment ids
    Ids,
    /// Show the employee, task and status ids behind one assignment
    Show { id: RowId },
}

/// Resolve a natural key to its id, failing with a readable message when absent.
fn resolve(db: &Database, which: ForeignKey, key: &str) -> Result<RowId> {
    let id = match which {
        ForeignKey::Employee => db.find_employee_id(key)?,
        ForeignKey::Task => db.find_task_id(key)?,
        ForeignKey::Status => db.find_status_id(key)?,
    };
    id.ok_or_else(|| Error::not_found(which, key).into())
}

pub fn run_assign(db: &Database, args: AssignArgs, format: OutputFormat) -> Result<String> {
    let rows: Vec<AssignmentRow> = match args {
        AssignArgs::Add {
            employee,
            task,
            status,
        } => {
            let assignment = Assignment::new(
                resolve(db, ForeignKey::Employee, &employee)?,
                resolve(db, ForeignKey::Task, &task)?,
                resolve(db, ForeignKey::Status, &status)?,
            )?;
            db.insert_assignment(&assignment)?;
            db.get_last_assignment()?.into_iter().collect()
        }
        AssignArgs::Edit {
            id,
            employee,
            task,
            status,
        } => {
            let current = db
                .get_assignment_selection(id)?
                .ok_or_else(|| Error::not_found("assignment", id))?;
            let pick = |which: ForeignKey, key: Option<&String>| match key {
                Some(key) => resolve(db, which, key),
                None => Ok(current.get(which)),
            };
            let employee_id = pick(ForeignKey::Employee, employee.as_ref())?;
            let task_id = pick(ForeignKey::Task, task.as_ref())?;
            let status_id = pick(ForeignKey::Status, status.as_ref())?;

            db.update_assignment(id, employee_id, task_id, status_id)?;
            db.get_all_assignments()?
                .into_iter()
                .filter(|row| row.id == id)
                .collect()
        }
        AssignArgs::List { employee, status } => match (employee, status) {
            (Some(employee), _) => db.filter_assignments_by_employee(&employee)?,
            (None, Some(status)) => db.filter_assignments_by_status(&status)?,
            (None, None) => db.get_all_assignments()?,
        },
        AssignArgs::Ids => {
            let ids = db.get_assignment_ids()?;
            return Ok(match format {
                OutputFormat::Json => to_json(&ids),
                OutputFormat::Markdown => format_list_markdown("Assignment IDs", &ids),
            });
        }
        AssignArgs::Show { id } => {
            let mut keys = Vec::new();
            for which in [ForeignKey::Employee, ForeignKey::Task, ForeignKey::Status] {
                match db.get_foreign_key_from_assignment(id, which)? {
                    Some(key) => keys.push((which, key)),
                    None => return Err(Error::not_found("assignment", id).into()),
                }
            }
            return Ok(match format {
                OutputFormat::Json => {
                    let mut value = json!({ "assignment_id": id });
                    for (which, key) in keys {
                        value[format!("{}_id", which)] = json!(key);
                    }
                    to_json(&value)
                }
                OutputFormat::Markdown => {
                    let mut md = format!("# Assignment {}\n\n", id);
                    for (which, key) in keys {
                        md.push_str(&format!("- **{}_id**: {}\n", which, key));
                    }
                    md
                }
            });
        }
    };

    Ok(match format {
        OutputFormat::Json => to_json(&rows),
        OutputFormat::Markdown => format_assignments_markdown(&rows),
    })
}
