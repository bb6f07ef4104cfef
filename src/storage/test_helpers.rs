//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and test data creation
//! used across storage module tests.

#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::config::DatabaseConfig;
#[cfg(test)]
use crate::storage::insert::InsertRow;
#[cfg(test)]
use crate::storage::{init_db_pool_with_config, run_migrations};

/// Creates a test database pool with the sandbox schema attached and migrations applied.
/// Uses an in-memory database for fast test execution.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = init_db_pool_with_config(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A valid todo row.
#[cfg(test)]
pub fn todo_row(title: &str, details: &str) -> InsertRow {
    InsertRow::new()
        .with("c_title", title)
        .with("c_details", details)
}

/// Number of rows currently in sandbox.t_todo.
#[cfg(test)]
pub async fn count_todos(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sandbox.t_todo")
        .fetch_one(pool)
        .await
        .expect("Failed to count todos")
}
