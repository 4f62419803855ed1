//! Employee, task and status subcommands.
//!
//! `add` validates the input, inserts it, and echoes the stored row back via
//! the matching `get_last_*` query.

use crate::db::Database;
use crate::format::{
    OutputFormat, format_employees_markdown, format_list_markdown, format_statuses_markdown,
    format_tasks_markdown, to_json,
};
use crate::types::{Employee, Status, Task};
use anyhow::{Result, anyhow};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum EmployeeArgs {
    /// Add an employee
    Add {
        #[arg(long)]
        first: String,
        #[arg(long)]
        last: String,
        /// Any punctuation is fine as long as there are 10 digits
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
    },
    /// List all employees
    List,
    /// List employee full names, ordered by id
    Names,
}

#[derive(Subcommand, Debug)]
pub enum TaskArgs {
    /// Add a task
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long, allow_hyphen_values = true)]
        price: String,
        #[arg(long, allow_hyphen_values = true)]
        hours: String,
    },
    /// List all tasks
    List,
    /// List task names, ordered by id
    Names,
}

#[derive(Subcommand, Debug)]
pub enum StatusArgs {
    /// Add a status
    Add {
        #[arg(long)]
        description: String,
    },
    /// List all statuses
    List,
    /// List status descriptions, ordered by id
    Names,
}

pub fn run_employee(db: &Database, args: EmployeeArgs, format: OutputFormat) -> Result<String> {
    let employees = match args {
        EmployeeArgs::Add {
            first,
            last,
            phone,
            email,
        } => {
            let employee = Employee::new(&first, &last, &phone, &email)?;
            db.insert_employee(&employee)?;
            let stored = db
                .get_last_employee()?
                .ok_or_else(|| anyhow!("employee was inserted but cannot be read back"))?;
            vec![stored]
        }
        EmployeeArgs::List => db.get_all_employees()?,
        EmployeeArgs::Names => return Ok(names(format, "Employees", &db.get_employee_names()?)),
    };

    Ok(match format {
        OutputFormat::Json => to_json(&employees),
        OutputFormat::Markdown => format_employees_markdown(&employees),
    })
}

pub fn run_task(db: &Database, args: TaskArgs, format: OutputFormat) -> Result<String> {
    let tasks = match args {
        TaskArgs::Add {
            name,
            description,
            price,
            hours,
        } => {
            let task = Task::new(&name, &description, price.as_str(), hours.as_str())?;
            db.insert_task(&task)?;
            let stored = db
                .get_last_task()?
                .ok_or_else(|| anyhow!("task was inserted but cannot be read back"))?;
            vec![stored]
        }
        TaskArgs::List => db.get_all_tasks()?,
        TaskArgs::Names => return Ok(names(format, "Tasks", &db.get_task_names()?)),
    };

    Ok(match format {
        OutputFormat::Json => to_json(&tasks),
        OutputFormat::Markdown => format_tasks_markdown(&tasks),
    })
}

pub fn run_status(db: &Database, args: StatusArgs, format: OutputFormat) -> Result<String> {
    let statuses = match args {
        StatusArgs::Add { description } => {
            let status = Status::new(&description)?;
            db.insert_status(&status)?;
            let stored = db
                .get_last_status()?
                .ok_or_else(|| anyhow!("status was inserted but cannot be read back"))?;
            vec![stored]
        }
        StatusArgs::List => db.get_all_statuses()?,
        StatusArgs::Names => return Ok(names(format, "Statuses", &db.get_status_names()?)),
    };

    Ok(match format {
        OutputFormat::Json => to_json(&statuses),
        OutputFormat::Markdown => format_statuses_markdown(&statuses),
    })
}

fn names(format: OutputFormat, title: &str, names: &[String]) -> String {
    match format {
        OutputFormat::Json => to_json(names),
        OutputFormat::Markdown => format_list_markdown(title, names),
    }
}
