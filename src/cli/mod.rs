//! CLI command definitions for the `pm` binary.
//!
//! This module defines the CLI structure using clap's derive macros and
//! dispatches each subcommand onto the database gateway. Every command
//! returns the text to print so the caller decides where it goes.

pub mod assign;
pub mod records;

use crate::db::Database;
use crate::format::{OutputFormat, format_schema_markdown, to_json};
use anyhow::Result;
use assign::AssignArgs;
use clap::{Parser, Subcommand};
use records::{EmployeeArgs, StatusArgs, TaskArgs};
use serde_json::json;
use std::path::PathBuf;

/// Track employees, tasks, statuses and the assignments linking them
#[derive(Parser, Debug)]
#[command(name = "pm", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr, or filename (overrides config)
    #[arg(short, long, global = true)]
    pub log: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the tables if they do not exist
    Init,

    /// Drop all tables and recreate them empty
    Reset,

    /// Report whether any assignment exists
    IsEmpty,

    /// Add and list employees
    #[command(subcommand)]
    Employee(EmployeeArgs),

    /// Add and list tasks
    #[command(subcommand)]
    Task(TaskArgs),

    /// Add and list statuses
    #[command(subcommand)]
    Status(StatusArgs),

    /// Create, edit, filter and inspect assignments
    #[command(subcommand)]
    Assign(AssignArgs),

    /// Show tables and their foreign keys
    Schema,
}

/// Run one command against the database and return its rendered output.
///
/// Every command except `reset` first makes sure the schema exists.
pub fn run(db: &Database, command: Command, format: OutputFormat) -> Result<String> {
    match command {
        Command::Init => {
            db.ensure_schema()?;
            Ok(message(format, "Schema ready"))
        }
        Command::Reset => {
            db.reset_schema()?;
            db.ensure_schema()?;
            Ok(message(format, "All tables dropped and recreated"))
        }
        Command::IsEmpty => {
            let empty = db.is_empty()?;
            Ok(match format {
                OutputFormat::Json => to_json(&json!({ "empty": empty })),
                OutputFormat::Markdown => {
                    if empty {
                        "No assignments stored\n".to_string()
                    } else {
                        "Assignments present\n".to_string()
                    }
                }
            })
        }
        Command::Employee(args) => {
            db.ensure_schema()?;
            records::run_employee(db, args, format)
        }
        Command::Task(args) => {
            db.ensure_schema()?;
            records::run_task(db, args, format)
        }
        Command::Status(args) => {
            db.ensure_schema()?;
            records::run_status(db, args, format)
        }
        Command::Assign(args) => {
            db.ensure_schema()?;
            assign::run_assign(db, args, format)
        }
        Command::Schema => {
            db.ensure_schema()?;
            let schema = db.get_schema()?;
            Ok(match format {
                OutputFormat::Json => to_json(&schema),
                OutputFormat::Markdown => format_schema_markdown(&schema),
            })
        }
    }
}

/// A one-line confirmation in the requested format.
pub(crate) fn message(format: OutputFormat, text: &str) -> String {
    match format {
        OutputFormat::Json => to_json(&json!({ "message": text })),
        OutputFormat::Markdown => format!("{}\n", text),
    }
}
