//! Structured error types for validation and storage failures.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    InvalidFieldValue,

    // Not found errors
    NotFound,

    // Storage errors
    ConnectionFailed,
    ConstraintViolation,
    MissingTable,
    MigrationFailed,
    DatabaseError,

    // Internal errors
    InternalError,
}

/// The input field a validation failure refers to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Phone,
    Email,
    Name,
    Description,
    Price,
    Hours,
    Employee,
    Task,
    Status,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first name",
            Field::LastName => "last name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Name => "name",
            Field::Description => "description",
            Field::Price => "price",
            Field::Hours => "hours",
            Field::Employee => "employee",
            Field::Task => "task",
            Field::Status => "status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationReason {
    /// Value does not match the field's pattern.
    Malformed,
    /// Trimmed value is too short to be meaningful.
    TooShort,
    /// Phone number does not reduce to exactly ten digits.
    WrongDigitCount,
    /// Value cannot be read as a finite number.
    NotNumeric,
    /// Number is zero or negative.
    NotPositive,
}

/// A field value that failed normalization.
///
/// Callers branch on `field` and `reason`; `message` is what gets shown to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: ValidationReason,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: ValidationReason, message: impl Into<String>) -> Self {
        Self {
            field,
            reason,
            message: message.into(),
        }
    }

    pub fn malformed(field: Field) -> Self {
        Self::new(
            field,
            ValidationReason::Malformed,
            format!("Not a valid {}", field),
        )
    }

    pub fn too_short(field: Field) -> Self {
        Self::new(
            field,
            ValidationReason::TooShort,
            format!("Not a valid {}, must be at least 2 characters", field),
        )
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::InvalidFieldValue
    }
}

/// A failed store operation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("missing table: {0}")]
    MissingTable(String),

    #[error("schema migration failed: {0}")]
    Migration(#[from] refinery::Error),

    #[error("database error: {0}")]
    Sqlite(rusqlite::Error),
}

impl StorageError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StorageError::Open { .. } => ErrorCode::ConnectionFailed,
            StorageError::Constraint(_) => ErrorCode::ConstraintViolation,
            StorageError::MissingTable(_) => ErrorCode::MissingTable,
            StorageError::Migration(_) => ErrorCode::MigrationFailed,
            StorageError::Sqlite(_) => ErrorCode::DatabaseError,
        }
    }

    /// True when the failure came from a table that has not been created yet.
    pub fn is_missing_table(&self) -> bool {
        matches!(self, StorageError::MissingTable(_))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ffi, msg) = &err {
            if ffi.code == rusqlite::ErrorCode::ConstraintViolation {
                return StorageError::Constraint(msg.clone().unwrap_or_else(|| err.to_string()));
            }
            if let Some(msg) = msg
                && let Some(table) = msg.strip_prefix("no such table:")
            {
                return StorageError::MissingTable(table.trim().to_string());
            }
        }
        StorageError::Sqlite(err)
    }
}

/// Either kind of failure, for flows that validate and then persist.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database Error: {0}")]
    Storage(#[from] StorageError),

    /// A natural key or id that matches no row.
    #[error("Not Found: no {kind} matching '{key}'")]
    NotFound { kind: String, key: String },
}

impl Error {
    pub fn not_found(kind: impl fmt::Display, key: impl fmt::Display) -> Self {
        Error::NotFound {
            kind: kind.to_string(),
            key: key.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Validation(e) => e.code(),
            Error::Storage(e) => e.code(),
            Error::NotFound { .. } => ErrorCode::NotFound,
        }
    }
}

/// Result type for validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Result type for store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_names_field() {
        let err = ValidationError::malformed(Field::FirstName);
        assert_eq!(err.to_string(), "Not a valid first name");
        assert_eq!(err.reason, ValidationReason::Malformed);
    }

    #[test]
    fn validation_error_serializes_codes() {
        let err = ValidationError::too_short(Field::Description);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["field"], "description");
        assert_eq!(json["reason"], "TOO_SHORT");
    }

    #[test]
    fn missing_table_is_classified() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: StorageError = conn
            .query_row("SELECT count(*) FROM assignment", [], |row| row.get::<_, i64>(0))
            .unwrap_err()
            .into();
        assert!(err.is_missing_table());
        assert_eq!(err.code(), ErrorCode::MissingTable);
    }

    #[test]
    fn unique_violation_is_constraint() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: StorageError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert_eq!(err.code(), ErrorCode::ConstraintViolation);
    }

    #[test]
    fn combined_error_prefixes_kind() {
        let err: Error = ValidationError::malformed(Field::Email).into();
        assert_eq!(err.to_string(), "Validation Error: Not a valid email");
        assert_eq!(err.code(), ErrorCode::InvalidFieldValue);

        let missing = Error::not_found("employee", "Nobody Here");
        assert_eq!(
            missing.to_string(),
            "Not Found: no employee matching 'Nobody Here'"
        );
        assert_eq!(missing.code(), ErrorCode::NotFound);
    }
}
