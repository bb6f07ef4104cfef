//! Metadata-driven single-table insert.
//!
//! A [`TableInsertBuilder`] collects the table name, schema, insertable columns
//! and generated-key columns. [`TableInsertBuilder::compile`] validates them
//! against the live table once and produces an immutable [`TableInsert`],
//! which generates the INSERT statement, binds row values, executes single
//! and batched inserts, and reads back generated keys.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::debug;
use serde::Serialize;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, TypeInfo, ValueRef};

use super::metadata::{qualified_name, quote_identifier, ColumnMetaData, ColumnType, TableMetaData};
use super::value::{InsertRow, Value};
use crate::error_handling::{BindingError, ConfigurationError, InsertError};

type InsertQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// What to insert into: table, schema and columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConfig {
    /// Attached schema name, `None` for `main`
    pub schema: Option<String>,
    /// Table name
    pub table: String,
    /// Columns callers may supply; empty means every column that is not a generated key
    pub columns: Vec<String>,
    /// Columns the database assigns, read back by key-returning inserts
    pub generated_key_columns: Vec<String>,
}

impl TableConfig {
    /// `schema.table`, or just `table`.
    pub fn qualified_name(&self) -> String {
        qualified_name(self.schema.as_deref(), &self.table)
    }
}

/// Collects a [`TableConfig`] and compiles it against the database.
///
/// # Examples
///
/// ```no_run
/// use todo_insert::{InsertRow, TableInsertBuilder};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let insert = TableInsertBuilder::new("t_todo")
///     .schema("sandbox")
///     .columns(["c_title", "c_details"])
///     .generated_key_columns(["id"])
///     .compile(&pool)
///     .await?;
///
/// let id = insert
///     .execute_and_return_key(&InsertRow::new().with("c_title", "Buy milk"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableInsertBuilder {
    config: TableConfig,
}

impl TableInsertBuilder {
    /// Starts configuring an insert into `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            config: TableConfig {
                table: table.into(),
                ..Default::default()
            },
        }
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the schema the table lives in.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.config.schema = Some(schema.into());
        self
    }

    /// Restricts the insert to these columns, in this order.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Columns whose generated values key-returning inserts read back.
    pub fn generated_key_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.generated_key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The configuration collected so far.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Validates the configuration against the table and builds the insert statements.
    ///
    /// # Errors
    ///
    /// [`InsertError::Configuration`] if a name is not a plain identifier, the
    /// table or a configured column does not exist, a column is configured
    /// twice, or a column is both insertable and generated.
    /// [`InsertError::Database`] if the metadata cannot be read.
    pub async fn compile(self, pool: &SqlitePool) -> Result<TableInsert, InsertError> {
        let config = self.config;

        let quoted_table = match &config.schema {
            Some(schema) => format!(
                "{}.{}",
                quote_identifier(schema)?,
                quote_identifier(&config.table)?
            ),
            None => quote_identifier(&config.table)?,
        };
        for column in config.columns.iter().chain(&config.generated_key_columns) {
            quote_identifier(column)?;
        }
        ensure_unique(&config.columns)?;
        ensure_unique(&config.generated_key_columns)?;

        let mut conn = pool.acquire().await?;
        let metadata = TableMetaData::load(&mut conn, config.schema.as_deref(), &config.table).await?;
        drop(conn);
        if !metadata.exists() {
            return Err(ConfigurationError::TableNotFound {
                table: config.qualified_name(),
            }
            .into());
        }

        let key_columns = config
            .generated_key_columns
            .iter()
            .map(|name| metadata.require_column(name).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        let is_key = |name: &str| key_columns.iter().any(|k| k.name.eq_ignore_ascii_case(name));

        let insert_columns = if config.columns.is_empty() {
            metadata
                .columns()
                .iter()
                .filter(|c| !is_key(&c.name))
                .map(|c| c.name.clone())
                .collect::<Vec<_>>()
        } else {
            let mut resolved = Vec::with_capacity(config.columns.len());
            for name in &config.columns {
                let column = metadata.require_column(name)?;
                if is_key(&column.name) {
                    return Err(ConfigurationError::GeneratedColumnInserted(name.clone()).into());
                }
                resolved.push(column.name.clone());
            }
            resolved
        };

        let insert_sql = insert_statement(&quoted_table, &insert_columns)?;
        let returning_sql = if key_columns.is_empty() {
            None
        } else {
            let returning = key_columns
                .iter()
                .map(|c| quote_identifier(&c.name))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            Some(format!("{insert_sql} RETURNING {returning}"))
        };

        debug!(
            "Compiled insert for {}: {}",
            metadata.qualified_name(),
            returning_sql.as_deref().unwrap_or(&insert_sql)
        );

        Ok(TableInsert {
            pool: pool.clone(),
            config,
            metadata,
            insert_columns,
            key_columns,
            insert_sql,
            returning_sql,
        })
    }
}

fn ensure_unique(columns: &[String]) -> Result<(), ConfigurationError> {
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].iter().any(|c| c.eq_ignore_ascii_case(column)) {
            return Err(ConfigurationError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

fn insert_statement(quoted_table: &str, columns: &[String]) -> Result<String, ConfigurationError> {
    if columns.is_empty() {
        return Ok(format!("INSERT INTO {quoted_table} DEFAULT VALUES"));
    }
    let names = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {quoted_table} ({names}) VALUES ({placeholders})"
    ))
}

fn bind_values(sql: &str, values: Vec<Value>) -> InsertQuery<'_> {
    values
        .into_iter()
        .fold(sqlx::query(sql), |query, value| match value {
            Value::Text(v) => query.bind(v),
            Value::Integer(v) => query.bind(v),
            Value::Real(v) => query.bind(v),
            Value::Blob(v) => query.bind(v),
            Value::Timestamp(v) => query.bind(v),
            Value::Null => query.bind(Option::<String>::None),
        })
}

/// Decodes a returned key by the value's storage class, not the declared type.
/// Text in a timestamp column becomes a `Timestamp` when it parses.
fn decode_key(row: &SqliteRow, index: usize, column_type: ColumnType) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" => Value::Integer(row.try_get_unchecked(index)?),
        "REAL" => Value::Real(row.try_get_unchecked(index)?),
        "BLOB" => Value::Blob(row.try_get_unchecked(index)?),
        _ => match column_type {
            ColumnType::Timestamp => match row.try_get_unchecked::<NaiveDateTime, _>(index) {
                Ok(ts) => Value::Timestamp(ts),
                Err(_) => Value::Text(row.try_get_unchecked(index)?),
            },
            ColumnType::Integer | ColumnType::Text => Value::Text(row.try_get_unchecked(index)?),
        },
    };
    Ok(value)
}

/// Generated values read back from an insert, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyHolder {
    keys: BTreeMap<String, Value>,
}

impl KeyHolder {
    /// Value of a generated column, matched case-insensitively.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.keys
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    /// All generated values.
    pub fn keys(&self) -> &BTreeMap<String, Value> {
        &self.keys
    }

    /// Number of generated columns read back.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing was read back.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Consumes the holder, returning the column/value map.
    pub fn into_keys(self) -> BTreeMap<String, Value> {
        self.keys
    }
}

/// A compiled, immutable insert into one table.
///
/// Holds the pool it was compiled against; every operation has an `_in`
/// variant that runs on a caller-supplied connection instead, so it takes
/// part in whatever transaction is open there. The insert never begins,
/// commits or rolls back a transaction itself.
#[derive(Debug, Clone)]
pub struct TableInsert {
    pool: SqlitePool,
    config: TableConfig,
    metadata: TableMetaData,
    insert_columns: Vec<String>,
    key_columns: Vec<ColumnMetaData>,
    insert_sql: String,
    returning_sql: Option<String>,
}

impl TableInsert {
    /// The configuration this insert was compiled from.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Table metadata read at compile time.
    pub fn metadata(&self) -> &TableMetaData {
        &self.metadata
    }

    /// Columns bound on every insert, in statement order.
    pub fn insert_columns(&self) -> &[String] {
        &self.insert_columns
    }

    /// Generated-key columns, as declared in the table.
    pub fn generated_key_columns(&self) -> Vec<&str> {
        self.key_columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The INSERT statement used by `execute` and `execute_batch`.
    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }

    /// Maps a row onto the insert columns. Absent columns are bound as NULL.
    fn bind_row(&self, row: &InsertRow) -> Result<Vec<Value>, BindingError> {
        let mut values = vec![Value::Null; self.insert_columns.len()];
        let mut seen = vec![false; self.insert_columns.len()];
        for (column, value) in row.iter() {
            let index = self
                .insert_columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(column))
                .ok_or_else(|| BindingError::UnknownColumn {
                    table: self.config.qualified_name(),
                    column: column.to_string(),
                })?;
            if seen[index] {
                return Err(BindingError::DuplicateColumn(column.to_string()));
            }
            seen[index] = true;
            values[index] = value.clone();
        }
        Ok(values)
    }

    /// Inserts one row and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// [`InsertError::Binding`] if the row names a column that is not
    /// insertable; [`InsertError::ConstraintViolation`] if the row breaks a
    /// table constraint; [`InsertError::Database`] for anything else.
    pub async fn execute(&self, row: &InsertRow) -> Result<u64, InsertError> {
        let mut conn = self.pool.acquire().await?;
        self.execute_in(&mut conn, row).await
    }

    /// [`Self::execute`] on the given connection.
    pub async fn execute_in(
        &self,
        conn: &mut SqliteConnection,
        row: &InsertRow,
    ) -> Result<u64, InsertError> {
        let values = self.bind_row(row)?;
        let result = bind_values(&self.insert_sql, values)
            .execute(&mut *conn)
            .await?;
        debug!(
            "Inserted {} row(s) into {}",
            result.rows_affected(),
            self.config.qualified_name()
        );
        Ok(result.rows_affected())
    }

    /// Inserts one row and returns its single generated key.
    ///
    /// # Errors
    ///
    /// [`InsertError::Configuration`] unless exactly one generated-key column
    /// is configured and it is an integer column; otherwise as [`Self::execute`].
    pub async fn execute_and_return_key(&self, row: &InsertRow) -> Result<i64, InsertError> {
        let mut conn = self.pool.acquire().await?;
        self.execute_and_return_key_in(&mut conn, row).await
    }

    /// [`Self::execute_and_return_key`] on the given connection.
    pub async fn execute_and_return_key_in(
        &self,
        conn: &mut SqliteConnection,
        row: &InsertRow,
    ) -> Result<i64, InsertError> {
        let key = match self.key_columns.as_slice() {
            [] => return Err(ConfigurationError::NoGeneratedKeyColumns.into()),
            [key] => key,
            columns => {
                return Err(ConfigurationError::GeneratedKeyCount {
                    found: columns.len(),
                    columns: columns.iter().map(|c| c.name.clone()).collect(),
                }
                .into())
            }
        };
        let non_numeric = || ConfigurationError::NonNumericKey {
            column: key.name.clone(),
            column_type: key.column_type,
        };
        if key.column_type != ColumnType::Integer {
            return Err(non_numeric().into());
        }

        let holder = self.execute_and_return_key_holder_in(conn, row).await?;
        holder
            .get(&key.name)
            .and_then(Value::as_i64)
            .ok_or_else(|| non_numeric().into())
    }

    /// Inserts one row and returns every generated-key column.
    ///
    /// # Errors
    ///
    /// [`InsertError::Configuration`] if no generated-key column is
    /// configured; otherwise as [`Self::execute`].
    pub async fn execute_and_return_key_holder(
        &self,
        row: &InsertRow,
    ) -> Result<KeyHolder, InsertError> {
        let mut conn = self.pool.acquire().await?;
        self.execute_and_return_key_holder_in(&mut conn, row).await
    }

    /// [`Self::execute_and_return_key_holder`] on the given connection.
    pub async fn execute_and_return_key_holder_in(
        &self,
        conn: &mut SqliteConnection,
        row: &InsertRow,
    ) -> Result<KeyHolder, InsertError> {
        let sql = self
            .returning_sql
            .as_deref()
            .ok_or(ConfigurationError::NoGeneratedKeyColumns)?;
        let values = self.bind_row(row)?;
        let record = bind_values(sql, values).fetch_one(&mut *conn).await?;

        let mut keys = BTreeMap::new();
        for (index, column) in self.key_columns.iter().enumerate() {
            keys.insert(
                column.name.clone(),
                decode_key(&record, index, column.column_type)?,
            );
        }
        debug!(
            "Inserted 1 row into {} with generated keys {:?}",
            self.config.qualified_name(),
            keys
        );
        Ok(KeyHolder { keys })
    }

    /// Inserts each row in order and returns one affected-row count per row.
    ///
    /// Every row is bound before the first insert runs, so a binding error
    /// inserts nothing.
    ///
    /// # Errors
    ///
    /// [`InsertError::Batch`] carrying the index of the failing row and its
    /// error. Rows before it stay inserted unless the caller rolls back.
    pub async fn execute_batch(&self, rows: &[InsertRow]) -> Result<Vec<u64>, InsertError> {
        let mut conn = self.pool.acquire().await?;
        self.execute_batch_in(&mut conn, rows).await
    }

    /// [`Self::execute_batch`] on the given connection.
    pub async fn execute_batch_in(
        &self,
        conn: &mut SqliteConnection,
        rows: &[InsertRow],
    ) -> Result<Vec<u64>, InsertError> {
        let batch_error = |index: usize| {
            move |err: InsertError| InsertError::Batch {
                index,
                source: Box::new(err),
            }
        };

        let bound = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                self.bind_row(row)
                    .map_err(|e| batch_error(index)(e.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut counts = Vec::with_capacity(bound.len());
        for (index, values) in bound.into_iter().enumerate() {
            let result = bind_values(&self.insert_sql, values)
                .execute(&mut *conn)
                .await
                .map_err(|e| batch_error(index)(e.into()))?;
            counts.push(result.rows_affected());
        }
        debug!(
            "Batch inserted {} row(s) into {}",
            counts.len(),
            self.config.qualified_name()
        );
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{count_todos, create_test_pool, todo_row};

    fn todo_builder() -> TableInsertBuilder {
        TableInsertBuilder::new("t_todo")
            .schema("sandbox")
            .columns(["c_title", "c_details"])
    }

    #[tokio::test]
    async fn test_compile_generates_insert_sql() {
        let pool = create_test_pool().await;
        let insert = todo_builder()
            .generated_key_columns(["id"])
            .compile(&pool)
            .await
            .expect("Failed to compile insert");

        assert_eq!(
            insert.insert_sql(),
            "INSERT INTO \"sandbox\".\"t_todo\" (\"c_title\", \"c_details\") VALUES (?, ?)"
        );
        assert_eq!(insert.insert_columns(), ["c_title", "c_details"]);
        assert_eq!(insert.generated_key_columns(), ["id"]);
    }

    #[tokio::test]
    async fn test_compile_without_columns_uses_all_but_generated() {
        let pool = create_test_pool().await;
        let insert = TableInsertBuilder::new("t_todo")
            .schema("sandbox")
            .generated_key_columns(["id", "c_created_at"])
            .compile(&pool)
            .await
            .expect("Failed to compile insert");

        assert_eq!(insert.insert_columns(), ["c_title", "c_details"]);
    }

    #[tokio::test]
    async fn test_compile_from_config() {
        let pool = create_test_pool().await;
        let config = TableConfig {
            schema: Some("sandbox".to_string()),
            table: "t_todo".to_string(),
            columns: vec!["c_title".to_string()],
            generated_key_columns: vec!["id".to_string()],
        };

        let insert = TableInsertBuilder::from_config(config.clone())
            .compile(&pool)
            .await
            .expect("Failed to compile insert");

        assert_eq!(insert.config(), &config);
        assert_eq!(insert.insert_columns(), ["c_title"]);
        assert_eq!(
            insert
                .execute_and_return_key(&InsertRow::new().with("c_title", "Title"))
                .await
                .expect("insert"),
            1
        );
    }

    #[tokio::test]
    async fn test_compile_uses_declared_column_case() {
        let pool = create_test_pool().await;
        let insert = TableInsertBuilder::new("t_todo")
            .schema("sandbox")
            .columns(["C_TITLE"])
            .generated_key_columns(["ID"])
            .compile(&pool)
            .await
            .expect("Failed to compile insert");

        assert_eq!(insert.insert_columns(), ["c_title"]);
        assert_eq!(insert.generated_key_columns(), ["id"]);
    }

    #[tokio::test]
    async fn test_compile_missing_table() {
        let pool = create_test_pool().await;
        let err = TableInsertBuilder::new("t_missing")
            .schema("sandbox")
            .compile(&pool)
            .await
            .expect_err("missing table must not compile");

        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::TableNotFound { ref table })
                if table == "sandbox.t_missing"
        ));
    }

    #[tokio::test]
    async fn test_compile_missing_column() {
        let pool = create_test_pool().await;
        let err = todo_builder()
            .columns(["c_title", "c_priority"])
            .compile(&pool)
            .await
            .expect_err("missing column must not compile");

        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::ColumnNotFound { ref column, .. })
                if column == "c_priority"
        ));
    }

    #[tokio::test]
    async fn test_compile_missing_generated_key_column() {
        let pool = create_test_pool().await;
        let err = todo_builder()
            .generated_key_columns(["uuid"])
            .compile(&pool)
            .await
            .expect_err("missing key column must not compile");

        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::ColumnNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_compile_rejects_inserting_generated_column() {
        let pool = create_test_pool().await;
        let err = todo_builder()
            .columns(["id", "c_title"])
            .generated_key_columns(["id"])
            .compile(&pool)
            .await
            .expect_err("overlapping columns must not compile");

        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::GeneratedColumnInserted(_))
        ));
    }

    #[tokio::test]
    async fn test_compile_rejects_invalid_and_duplicate_names() {
        let pool = create_test_pool().await;

        let err = TableInsertBuilder::new("t_todo; DROP TABLE t_todo")
            .compile(&pool)
            .await
            .expect_err("invalid identifier must not compile");
        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::InvalidIdentifier(_))
        ));

        let err = todo_builder()
            .columns(["c_title", "C_TITLE"])
            .compile(&pool)
            .await
            .expect_err("duplicate column must not compile");
        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::DuplicateColumn(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_column_is_rejected_before_insert() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        let row = todo_row("Title", "Details").with("c_priority", 1i64);
        let err = insert.execute(&row).await.expect_err("unknown column");

        assert!(matches!(
            err,
            InsertError::Binding(BindingError::UnknownColumn { ref column, .. })
                if column == "c_priority"
        ));
        assert_eq!(count_todos(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_row_keys_match_case_insensitively() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        let row = InsertRow::new().with("C_Title", "Title");
        assert_eq!(insert.execute(&row).await.expect("insert"), 1);

        let row = InsertRow::new()
            .with("c_title", "Title")
            .with("C_TITLE", "Other");
        let err = insert.execute(&row).await.expect_err("duplicate column");
        assert!(matches!(
            err,
            InsertError::Binding(BindingError::DuplicateColumn(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_required_column_is_constraint_violation() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        let row = InsertRow::new().with("c_details", "No title");
        let err = insert.execute(&row).await.expect_err("NOT NULL violation");

        assert!(err.is_constraint_violation());
        assert_eq!(count_todos(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_blank_title_is_constraint_violation() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        let err = insert
            .execute(&todo_row("   ", "Details"))
            .await
            .expect_err("CHECK violation");

        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_absent_optional_column_is_null() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        insert
            .execute(&InsertRow::new().with("c_title", "Title"))
            .await
            .expect("insert");

        let details: Option<String> =
            sqlx::query_scalar("SELECT c_details FROM sandbox.t_todo WHERE id = 1")
                .fetch_one(&pool)
                .await
                .expect("Failed to fetch todo");
        assert_eq!(details, None);
    }

    #[tokio::test]
    async fn test_key_holder_decodes_timestamp() {
        let pool = create_test_pool().await;
        let insert = todo_builder()
            .generated_key_columns(["id", "c_created_at"])
            .compile(&pool)
            .await
            .expect("compiles");

        let holder = insert
            .execute_and_return_key_holder(&todo_row("Title", "Details"))
            .await
            .expect("insert");

        assert_eq!(holder.len(), 2);
        assert_eq!(holder.get("id"), Some(&Value::Integer(1)));
        assert!(holder
            .get("c_created_at")
            .and_then(Value::as_timestamp)
            .is_some());
    }

    #[tokio::test]
    async fn test_key_holder_reads_non_integer_keys() {
        let pool = create_test_pool().await;
        sqlx::query(
            "CREATE TABLE sandbox.t_scored (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                c_title TEXT NOT NULL,
                c_score REAL NOT NULL DEFAULT 1.5,
                c_amount NUMERIC DEFAULT 10.25,
                c_done BOOLEAN DEFAULT 0,
                c_digest BLOB DEFAULT x'01AB',
                c_note VARCHAR(20) DEFAULT 'n/a'
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create table");

        let insert = TableInsertBuilder::new("t_scored")
            .schema("sandbox")
            .columns(["c_title"])
            .generated_key_columns(["id", "c_score", "c_amount", "c_done", "c_digest", "c_note"])
            .compile(&pool)
            .await
            .expect("compiles");

        let keys = insert
            .execute_and_return_key_holder(&InsertRow::new().with("c_title", "Scored"))
            .await
            .expect("insert")
            .into_keys();

        assert_eq!(keys.get("id"), Some(&Value::Integer(1)));
        assert_eq!(keys.get("c_score"), Some(&Value::Real(1.5)));
        assert_eq!(keys.get("c_amount"), Some(&Value::Real(10.25)));
        assert_eq!(keys.get("c_done"), Some(&Value::Integer(0)));
        assert_eq!(keys.get("c_digest"), Some(&Value::Blob(vec![0x01, 0xAB])));
        assert_eq!(keys.get("c_note"), Some(&Value::Text("n/a".to_string())));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sandbox.t_scored")
            .fetch_one(&pool)
            .await
            .expect("Failed to count rows");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_return_key_rejects_real_key_before_insert() {
        let pool = create_test_pool().await;
        sqlx::query(
            "CREATE TABLE sandbox.t_scored (c_title TEXT NOT NULL, c_score REAL DEFAULT 1.5)",
        )
        .execute(&pool)
        .await
        .expect("Failed to create table");

        let insert = TableInsertBuilder::new("t_scored")
            .schema("sandbox")
            .generated_key_columns(["c_score"])
            .compile(&pool)
            .await
            .expect("compiles");

        let err = insert
            .execute_and_return_key(&InsertRow::new().with("c_title", "Scored"))
            .await
            .expect_err("real key is not an integer");
        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::NonNumericKey { .. })
        ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sandbox.t_scored")
            .fetch_one(&pool)
            .await
            .expect("Failed to count rows");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_return_key_rejects_non_numeric_key() {
        let pool = create_test_pool().await;
        let insert = todo_builder()
            .generated_key_columns(["c_created_at"])
            .compile(&pool)
            .await
            .expect("compiles");

        let err = insert
            .execute_and_return_key(&todo_row("Title", "Details"))
            .await
            .expect_err("timestamp key is not numeric");

        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::NonNumericKey {
                column_type: ColumnType::Timestamp,
                ..
            })
        ));
        assert_eq!(count_todos(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_key_returning_without_key_columns() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        let err = insert
            .execute_and_return_key_holder(&todo_row("Title", "Details"))
            .await
            .expect_err("no key columns");
        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::NoGeneratedKeyColumns)
        ));

        let err = insert
            .execute_and_return_key(&todo_row("Title", "Details"))
            .await
            .expect_err("no key columns");
        assert!(matches!(
            err,
            InsertError::Configuration(ConfigurationError::NoGeneratedKeyColumns)
        ));
    }

    #[tokio::test]
    async fn test_batch_binding_error_inserts_nothing() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        let rows = [
            todo_row("First", "Details"),
            todo_row("Second", "Details").with("c_unknown", "x"),
        ];
        let err = insert.execute_batch(&rows).await.expect_err("binding error");

        assert_eq!(err.batch_index(), Some(1));
        assert!(matches!(
            err,
            InsertError::Batch { ref source, .. } if matches!(**source, InsertError::Binding(_))
        ));
        assert_eq!(count_todos(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let pool = create_test_pool().await;
        let insert = todo_builder().compile(&pool).await.expect("compiles");

        let counts = insert.execute_batch(&[]).await.expect("empty batch");
        assert!(counts.is_empty());
    }

    #[test]
    fn test_insert_statement_without_columns() {
        assert_eq!(
            insert_statement("\"t\"", &[]).as_deref(),
            Ok("INSERT INTO \"t\" DEFAULT VALUES")
        );
    }
}
