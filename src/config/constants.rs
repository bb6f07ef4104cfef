//! Configuration constants.
//!
//! Defaults for the database location and the fixed layout of the todo table.

/// Default database path (SQLite file). The sandbox schema lives next to it.
pub const DB_PATH: &str = "./todo.db";

/// Environment variable overriding [`DB_PATH`].
pub const DB_PATH_ENV: &str = "TODO_DB_PATH";

/// Path SQLite understands as a private in-memory database.
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

/// Upper bound on pooled connections for file-backed databases.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Name the sandbox database is attached under on every connection.
pub const SANDBOX_SCHEMA: &str = "sandbox";

/// Todo table name.
pub const TODO_TABLE: &str = "t_todo";

/// Columns callers supply when inserting a todo.
pub const TODO_COLUMNS: [&str; 2] = ["c_title", "c_details"];

/// Columns whose values SQLite assigns on insert.
pub const TODO_GENERATED_KEY_COLUMNS: [&str; 2] = ["id", "c_created_at"];
