//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - The schema database attached on every connection
//! - WAL mode enabled for file-backed databases
//! - Automatic database file creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use log::{debug, error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, SqliteConnection, SqlitePool};

use crate::config::DatabaseConfig;
use crate::error_handling::DatabaseError;
use crate::storage::insert::quote_identifier;

/// Initializes and returns a database connection pool.
///
/// Uses the `TODO_DB_PATH` environment variable if set, otherwise falls back to the default.
pub async fn init_db_pool() -> Result<SqlitePool, DatabaseError> {
    init_db_pool_with_config(&DatabaseConfig::from_env()).await
}

/// Initializes and returns a database connection pool for `config`.
///
/// Creates the main and schema database files if they don't exist. Every
/// pooled connection attaches the schema database under `config.schema`, so
/// statements can address tables as `sandbox.t_todo`.
pub async fn init_db_pool_with_config(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let schema = quote_identifier(&config.schema).inspect_err(|e| {
        error!("Invalid schema name: {e}");
    })?;
    let schema_path = config.schema_path().to_string_lossy().into_owned();
    let in_memory = config.is_in_memory();

    let (options, pool_options) = if in_memory {
        // Each connection owns a separate in-memory database; keep exactly one alive.
        (
            SqliteConnectOptions::from_str("sqlite::memory:")?,
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        )
    } else {
        create_database_file(&config.db_path)?;
        create_database_file(Path::new(&schema_path))?;
        (
            SqliteConnectOptions::new()
                .filename(&config.db_path)
                .journal_mode(SqliteJournalMode::Wal),
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1)),
        )
    };

    let pool = pool_options
        .after_connect(move |conn, _meta| {
            let schema = schema.clone();
            let schema_path = schema_path.clone();
            Box::pin(async move { attach_schema(conn, &schema, &schema_path, in_memory).await })
        })
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    info!(
        "Database pool ready at {} (schema {} attached)",
        config.db_path.display(),
        config.schema
    );
    Ok(pool)
}

async fn attach_schema(
    conn: &mut SqliteConnection,
    quoted_schema: &str,
    schema_path: &str,
    in_memory: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("ATTACH DATABASE ? AS {quoted_schema}"))
        .bind(schema_path)
        .execute(&mut *conn)
        .await?;
    if !in_memory {
        conn.execute(format!("PRAGMA {quoted_schema}.journal_mode=WAL").as_str())
            .await?;
    }
    debug!("Attached {schema_path} as {quoted_schema}");
    Ok(())
}

fn create_database_file(path: &Path) -> Result<(), DatabaseError> {
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(_) => info!("Database file {} created successfully.", path.display()),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Database file {} already exists.", path.display())
        }
        Err(e) => {
            error!("Failed to create database file {}: {e}", path.display());
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }
    Ok(())
}
