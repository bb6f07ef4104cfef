//! Insert pre-configured for `sandbox.t_todo`.

use sqlx::{SqliteConnection, SqlitePool};

use super::table::{KeyHolder, TableInsert, TableInsertBuilder};
use super::value::InsertRow;
use crate::config::{SANDBOX_SCHEMA, TODO_COLUMNS, TODO_GENERATED_KEY_COLUMNS, TODO_TABLE};
use crate::error_handling::InsertError;

/// Inserts todos into `sandbox.t_todo`.
///
/// Callers supply `c_title` and `c_details`; `id` and `c_created_at` are
/// generated. Because there are two generated columns, use
/// [`Self::execute_and_return_key_holder`] to read them back;
/// [`Self::execute_and_return_key`] fails with a configuration error.
///
/// # Examples
///
/// ```no_run
/// use todo_insert::{InsertRow, TodoInserter};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let inserter = TodoInserter::new(&pool).await?;
/// let keys = inserter
///     .execute_and_return_key_holder(
///         &InsertRow::new()
///             .with("c_title", "Новая задача")
///             .with("c_details", "Описание новой задачи"),
///     )
///     .await?;
/// println!("id = {:?}", keys.get("id"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TodoInserter {
    insert: TableInsert,
}

impl TodoInserter {
    /// Builder holding the todo table configuration, before compilation.
    pub fn builder() -> TableInsertBuilder {
        TableInsertBuilder::new(TODO_TABLE)
            .schema(SANDBOX_SCHEMA)
            .columns(TODO_COLUMNS)
            .generated_key_columns(TODO_GENERATED_KEY_COLUMNS)
    }

    /// Compiles the todo insert against `pool`.
    ///
    /// # Errors
    ///
    /// [`InsertError::Configuration`] if `sandbox.t_todo` or one of its
    /// columns is missing.
    pub async fn new(pool: &SqlitePool) -> Result<Self, InsertError> {
        let insert = Self::builder().compile(pool).await?;
        Ok(Self { insert })
    }

    /// The underlying compiled insert.
    pub fn table_insert(&self) -> &TableInsert {
        &self.insert
    }

    /// Inserts one todo; returns the affected-row count.
    pub async fn execute(&self, row: &InsertRow) -> Result<u64, InsertError> {
        self.insert.execute(row).await
    }

    /// Inserts one todo on `conn`; returns the affected-row count.
    pub async fn execute_in(
        &self,
        conn: &mut SqliteConnection,
        row: &InsertRow,
    ) -> Result<u64, InsertError> {
        self.insert.execute_in(conn, row).await
    }

    /// Always a configuration error: the todo table has two generated columns.
    pub async fn execute_and_return_key(&self, row: &InsertRow) -> Result<i64, InsertError> {
        self.insert.execute_and_return_key(row).await
    }

    /// [`Self::execute_and_return_key`] on `conn`; fails the same way.
    pub async fn execute_and_return_key_in(
        &self,
        conn: &mut SqliteConnection,
        row: &InsertRow,
    ) -> Result<i64, InsertError> {
        self.insert.execute_and_return_key_in(conn, row).await
    }

    /// Inserts one todo; returns `id` and `c_created_at`.
    pub async fn execute_and_return_key_holder(
        &self,
        row: &InsertRow,
    ) -> Result<KeyHolder, InsertError> {
        self.insert.execute_and_return_key_holder(row).await
    }

    /// Inserts one todo on `conn`; returns `id` and `c_created_at`.
    pub async fn execute_and_return_key_holder_in(
        &self,
        conn: &mut SqliteConnection,
        row: &InsertRow,
    ) -> Result<KeyHolder, InsertError> {
        self.insert.execute_and_return_key_holder_in(conn, row).await
    }

    /// Inserts todos in order; returns one affected-row count per todo.
    pub async fn execute_batch(&self, rows: &[InsertRow]) -> Result<Vec<u64>, InsertError> {
        self.insert.execute_batch(rows).await
    }

    /// Inserts todos in order on `conn`.
    pub async fn execute_batch_in(
        &self,
        conn: &mut SqliteConnection,
        rows: &[InsertRow],
    ) -> Result<Vec<u64>, InsertError> {
        self.insert.execute_batch_in(conn, rows).await
    }
}
