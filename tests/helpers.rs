// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use sqlx::SqlitePool;
use std::path::Path;

use todo_insert::{init_db_pool_with_config, run_migrations, DatabaseConfig, InsertRow};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = init_db_pool_with_config(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Creates a file-backed test database pool with migrations applied.
#[allow(dead_code)]
pub async fn create_test_pool_with_path(db_path: &Path) -> SqlitePool {
    let pool = init_db_pool_with_config(&DatabaseConfig::with_path(db_path))
        .await
        .expect("Failed to create test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Empties sandbox.t_todo and restarts its id sequence at 1.
#[allow(dead_code)]
pub async fn reset_todo_sequence(pool: &SqlitePool) {
    sqlx::query("DELETE FROM sandbox.t_todo")
        .execute(pool)
        .await
        .expect("Failed to clear todos");
    sqlx::query("DELETE FROM sandbox.sqlite_sequence WHERE name = 't_todo'")
        .execute(pool)
        .await
        .expect("Failed to reset todo sequence");
}

/// A valid todo row.
#[allow(dead_code)]
pub fn todo_row(title: &str, details: &str) -> InsertRow {
    InsertRow::from([("c_title", title), ("c_details", details)])
}

/// Number of rows currently in sandbox.t_todo.
#[allow(dead_code)]
pub async fn count_todos(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sandbox.t_todo")
        .fetch_one(pool)
        .await
        .expect("Failed to count todos")
}
