//! todo_insert library: metadata-driven inserts into SQLite tables
//!
//! This library compiles an insert for one table (validating the table, its
//! insertable columns and its generated-key columns once against the live
//! database) and then inserts single rows or batches, optionally reading
//! back the values SQLite generated. [`TodoInserter`] is that insert
//! pre-configured for `sandbox.t_todo`.
//!
//! # Example
//!
//! ```no_run
//! use todo_insert::{init_db_pool_with_config, run_migrations, DatabaseConfig, InsertRow, TodoInserter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = init_db_pool_with_config(&DatabaseConfig::with_path("./todo.db")).await?;
//! run_migrations(&pool).await?;
//!
//! let inserter = TodoInserter::new(&pool).await?;
//! let counts = inserter
//!     .execute_batch(&[
//!         InsertRow::new().with("c_title", "Первая задача"),
//!         InsertRow::new().with("c_title", "Вторая задача"),
//!     ])
//!     .await?;
//! assert_eq!(counts, [1, 1]);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod initialization;
mod storage;

// Re-export public API
pub use config::{DatabaseConfig, LogFormat, LogLevel, Opt, OutputFormat};
pub use error_handling::{
    BindingError, ConfigurationError, DatabaseError, InitializationError, InsertError,
};
pub use storage::{
    init_db_pool, init_db_pool_with_config, run_migrations, ColumnMetaData, ColumnType, InsertRow,
    KeyHolder, TableConfig, TableInsert, TableInsertBuilder, TableMetaData, TodoInserter, Value,
};
