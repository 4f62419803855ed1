//! Output formatting utilities for markdown and JSON.

use crate::db::schema::TableInfo;
use crate::types::{AssignmentRow, Employee, Status, Task};
use serde::Serialize;
use std::fmt::Display;

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    #[value(alias = "md")]
    Markdown,
}

/// Render a markdown table. Pipes inside cells are escaped.
fn markdown_table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} ({})\n\n", title, rows.len()));
    if rows.is_empty() {
        md.push_str("_none_\n");
        return md;
    }

    md.push_str(&format!("| {} |\n", headers.join(" | ")));
    md.push_str(&format!(
        "|{}\n",
        headers.iter().map(|_| "---|").collect::<String>()
    ));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    md
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub fn format_employees_markdown(employees: &[Employee]) -> String {
    let rows: Vec<Vec<String>> = employees
        .iter()
        .map(|e| {
            vec![
                id_cell(e.id()),
                e.first().to_string(),
                e.last().to_string(),
                e.phone().to_string(),
                e.email().to_string(),
            ]
        })
        .collect();
    markdown_table(
        "Employees",
        &["ID", "First", "Last", "Phone", "Email"],
        &rows,
    )
}

pub fn format_tasks_markdown(tasks: &[Task]) -> String {
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                id_cell(t.id()),
                t.name().to_string(),
                t.description().to_string(),
                format!("{:.2}", t.price()),
                t.hours().to_string(),
            ]
        })
        .collect();
    markdown_table(
        "Tasks",
        &["ID", "Name", "Description", "Price", "Hours"],
        &rows,
    )
}

pub fn format_statuses_markdown(statuses: &[Status]) -> String {
    let rows: Vec<Vec<String>> = statuses
        .iter()
        .map(|s| vec![id_cell(s.id()), s.description().to_string()])
        .collect();
    markdown_table("Statuses", &["ID", "Description"], &rows)
}

pub fn format_assignments_markdown(assignments: &[AssignmentRow]) -> String {
    let rows: Vec<Vec<String>> = assignments
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.employee.clone(),
                a.task.clone(),
                a.status.clone(),
            ]
        })
        .collect();
    markdown_table(
        "Assignments",
        &["ID", "Employee", "Task", "Status"],
        &rows,
    )
}

/// A bulleted list, used for the name and id projections.
pub fn format_list_markdown<T: Display>(title: &str, items: &[T]) -> String {
    let mut md = format!("# {} ({})\n\n", title, items.len());
    for item in items {
        md.push_str(&format!("- {}\n", item));
    }
    md
}

pub fn format_schema_markdown(tables: &[TableInfo]) -> String {
    let mut md = String::from("# Schema\n\n");
    for table in tables {
        md.push_str(&format!("## {}\n", table.name));
        for fk in &table.foreign_keys {
            md.push_str(&format!(
                "- `{}` -> `{}.{}`\n",
                fk.from_column, fk.to_table, fk.to_column
            ));
        }
        md.push('\n');
    }
    md
}

/// Serialize any result as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": e.to_string() }).to_string()
    })
}
