//! Error type definitions.
//!
//! This module defines all error types used throughout the crate.

use log::SetLoggerError;
use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::storage::ColumnType;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database setup.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Error loading or applying migrations.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// The database configuration names an invalid schema.
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
}

/// The insert was configured in a way the table or the call cannot satisfy.
///
/// Raised by `compile` when the table metadata does not match, and by
/// key-returning calls whose generated-key configuration does not fit.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Schema, table or column name is not a plain SQL identifier.
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// The table does not exist in the schema.
    #[error("Table {table} not found")]
    TableNotFound {
        /// Qualified table name
        table: String,
    },

    /// A configured column does not exist in the table.
    #[error("Column {column} not found in table {table}")]
    ColumnNotFound {
        /// Qualified table name
        table: String,
        /// Configured column name
        column: String,
    },

    /// A column was configured both as insertable and as generated.
    #[error("Column {0} is configured both as insertable and as a generated key")]
    GeneratedColumnInserted(String),

    /// The same column was configured twice.
    #[error("Column {0} is configured more than once")]
    DuplicateColumn(String),

    /// A key-returning call needs generated-key columns but none are configured.
    #[error("No generated key columns configured")]
    NoGeneratedKeyColumns,

    /// Single-key retrieval with more than one generated-key column.
    #[error("Expected exactly one generated key column, found {found}: {columns:?}")]
    GeneratedKeyCount {
        /// Number of configured generated-key columns
        found: usize,
        /// Their names
        columns: Vec<String>,
    },

    /// The single generated key is not an integer column.
    #[error("Generated key {column} is {column_type}, not an integer")]
    NonNumericKey {
        /// Generated-key column
        column: String,
        /// Its declared type
        column_type: ColumnType,
    },
}

/// A row could not be bound to the configured columns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BindingError {
    /// The row names a column that is not insertable.
    #[error("Column {column} is not an insertable column of {table}")]
    UnknownColumn {
        /// Qualified table name
        table: String,
        /// Column as spelled in the row
        column: String,
    },

    /// Two row keys name the same column (column names are case-insensitive).
    #[error("Column {0} is given more than once")]
    DuplicateColumn(String),
}

/// Error types for insert operations.
///
/// Database errors are kept intact as the source; constraint failures are
/// split out so callers can tell bad data from a broken database.
#[derive(Error, Debug)]
pub enum InsertError {
    /// Table metadata or generated-key configuration mismatch.
    #[error("Insert configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The row does not fit the configured columns.
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    /// The row violates a NOT NULL, CHECK, UNIQUE or FOREIGN KEY constraint.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(#[source] sqlx::Error),

    /// Any other database failure.
    #[error("SQL error: {0}")]
    Database(#[source] sqlx::Error),

    /// A row of a batch failed; rows before it were executed.
    #[error("Batch insert failed at row {index}: {source}")]
    Batch {
        /// Zero-based position of the failing row
        index: usize,
        /// What went wrong with that row
        #[source]
        source: Box<InsertError>,
    },
}

impl From<sqlx::Error> for InsertError {
    fn from(err: sqlx::Error) -> Self {
        let is_constraint = match &err {
            sqlx::Error::Database(db_err) => matches!(
                db_err.kind(),
                ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
                    | ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
            ),
            _ => false,
        };
        if is_constraint {
            InsertError::ConstraintViolation(err)
        } else {
            InsertError::Database(err)
        }
    }
}

impl InsertError {
    /// Whether this error, or the batch row error it wraps, is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            InsertError::ConstraintViolation(_) => true,
            InsertError::Batch { source, .. } => source.is_constraint_violation(),
            _ => false,
        }
    }

    /// Index of the failing row for batch errors.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            InsertError::Batch { index, .. } => Some(*index),
            _ => None,
        }
    }
}
