//! Project Manager Library
//!
//! Validated employee, task, status and assignment records over a local
//! SQLite store. The `pm` binary is one presentation layer on top of it.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
pub mod validation;

pub use db::Database;
pub use error::{Error, StorageError, ValidationError};
