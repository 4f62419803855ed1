//! Project Manager CLI
//!
//! Command-line front end for tracking employees, tasks, statuses and
//! assignments in a local SQLite file.

use anyhow::Result;
use clap::Parser;
use project_manager::cli::{self, Cli};
use project_manager::config::Config;
use project_manager::db::Database;
use project_manager::error::{Error, ErrorCode, StorageError, ValidationError};
use project_manager::format::{OutputFormat, to_json};
use project_manager::logging::{self, LogOutput};
use serde_json::json;
use std::process::ExitCode;
use tracing::{debug, warn};

/// Map a failure to the label and code shown to the user.
///
/// `crate::Error` already carries its label in its message.
fn classify(err: &anyhow::Error) -> (Option<&'static str>, ErrorCode) {
    if let Some(e) = err.downcast_ref::<ValidationError>() {
        (Some("Validation Error"), e.code())
    } else if let Some(e) = err.downcast_ref::<StorageError>() {
        (Some("Database Error"), e.code())
    } else if let Some(e) = err.downcast_ref::<Error>() {
        (None, e.code())
    } else {
        (Some("Error"), ErrorCode::InternalError)
    }
}

fn report(err: &anyhow::Error, format: OutputFormat) {
    let (label, code) = classify(err);
    match format {
        OutputFormat::Json => {
            let mut body = json!({ "code": code, "message": err.to_string() });
            if let Some(e) = err.downcast_ref::<ValidationError>() {
                body["field"] = json!(e.field);
                body["reason"] = json!(e.reason);
            }
            eprintln!("{}", to_json(&body));
        }
        OutputFormat::Markdown => match label {
            Some(label) => eprintln!("{}: {:#}", label, err),
            None => eprintln!("{:#}", err),
        },
    }
}

fn run(cli: Cli) -> Result<String> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;

    // Override from CLI arguments
    if let Some(db_path) = &cli.database {
        config.database.path = db_path.clone();
    }
    if let Some(log) = &cli.log {
        config.logging.output = log.clone();
    }

    logging::init(
        &LogOutput::parse(&config.logging.output),
        &config.logging.level,
        cli.verbose,
    )?;

    config.ensure_db_dir()?;
    debug!(db_path = %config.database.path.display(), "Using database");

    let db = Database::open(&config.database.path);
    let result = cli::run(&db, cli.command, cli.format);
    if let Err(e) = db.close() {
        warn!(error = %e, "Failed to close database cleanly");
    }
    result
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e, format);
            ExitCode::FAILURE
        }
    }
}
