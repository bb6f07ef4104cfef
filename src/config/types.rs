//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and database configuration.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DB_PATH_ENV, DEFAULT_MAX_CONNECTIONS, IN_MEMORY_DB_PATH, SANDBOX_SCHEMA,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How the CLI prints the insert result.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `key=value` lines
    Plain,
    /// A single JSON object
    Json,
}

/// Where the main database and the attached schema live.
///
/// # Examples
///
/// ```
/// use todo_insert::DatabaseConfig;
/// use std::path::PathBuf;
///
/// let config = DatabaseConfig {
///     db_path: PathBuf::from("./todo.db"),
///     ..Default::default()
/// };
/// assert_eq!(config.schema_path(), PathBuf::from("./todo.sandbox.db"));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Main database file, or `:memory:`
    pub db_path: PathBuf,

    /// Name the schema database is attached under
    pub schema: String,

    /// Maximum pooled connections (forced to 1 for in-memory databases)
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            schema: SANDBOX_SCHEMA.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Reads the database path from `TODO_DB_PATH`, falling back to the default.
    pub fn from_env() -> Self {
        let db_path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DB_PATH.to_string());
        Self::with_path(db_path)
    }

    /// Configuration for a file-backed database at `db_path`.
    pub fn with_path(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Configuration for a private in-memory database.
    ///
    /// Every connection gets its own in-memory database, so the pool is
    /// limited to a single connection.
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(IN_MEMORY_DB_PATH),
            schema: SANDBOX_SCHEMA.to_string(),
            max_connections: 1,
        }
    }

    /// Whether the database lives in memory.
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_DB_PATH
    }

    /// File holding the attached schema: `todo.db` becomes `todo.sandbox.db`.
    pub fn schema_path(&self) -> PathBuf {
        if self.is_in_memory() {
            return PathBuf::from(IN_MEMORY_DB_PATH);
        }
        let stem = self
            .db_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "todo".to_string());
        self.db_path
            .with_file_name(format!("{}.{}.db", stem, self.schema))
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Insert one todo and print the affected-row count
/// todo_insert "Новая задача" "Описание новой задачи"
///
/// # Print the generated id and creation timestamp as JSON
/// todo_insert "Новая задача" --return-keys --output json
///
/// # With custom database path
/// todo_insert "Новая задача" --db-path ./custom.db
/// ```
#[derive(Debug, Parser)]
#[command(name = "todo_insert", about = "Inserts a todo into sandbox.t_todo.")]
pub struct Opt {
    /// Todo title
    pub title: String,

    /// Todo details
    pub details: Option<String>,

    /// Print the generated keys instead of the affected-row count
    #[arg(long)]
    pub return_keys: bool,

    /// Output format: plain|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, env = DB_PATH_ENV, default_value = DB_PATH)]
    pub db_path: PathBuf,
}

impl Opt {
    /// Database configuration derived from the command line.
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::with_path(&self.db_path)
    }
}
