//! Table metadata as reported by SQLite.
//!
//! Loaded once when an insert is compiled and used to validate the
//! configured columns and to decode generated keys.

use log::debug;
use sqlx::{Row, SqliteConnection};
use strum_macros::Display;

use crate::error_handling::ConfigurationError;

/// Family of a column's declared type.
///
/// Follows SQLite's affinity rules loosely: anything containing `INT` is an
/// integer, `DATE`/`TIME` types are timestamps, everything else is text.
/// Only integer keys can be returned as a single key, and text read back from
/// a timestamp column is parsed into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ColumnType {
    /// INTEGER affinity
    Integer,
    /// DATE, DATETIME, TIMESTAMP
    Timestamp,
    /// Anything else
    Text,
}

impl ColumnType {
    /// Maps a declared column type (`INTEGER`, `TIMESTAMP`, `TEXT`, ...) to its family.
    pub fn from_declared(declared: &str) -> Self {
        let declared = declared.to_ascii_uppercase();
        if declared.contains("INT") {
            ColumnType::Integer
        } else if declared.contains("DATE") || declared.contains("TIME") {
            ColumnType::Timestamp
        } else {
            ColumnType::Text
        }
    }
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetaData {
    /// Column name as declared
    pub name: String,
    /// Declared type, verbatim
    pub declared_type: String,
    /// Declared type family
    pub column_type: ColumnType,
    /// NOT NULL constraint
    pub not_null: bool,
    /// Part of the primary key
    pub primary_key: bool,
    /// Has a DEFAULT clause
    pub has_default: bool,
}

/// Columns of one table, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetaData {
    schema: Option<String>,
    table: String,
    columns: Vec<ColumnMetaData>,
}

impl TableMetaData {
    /// Reads the column list of `schema.table` via `pragma_table_info`.
    ///
    /// SQLite reports no columns for a missing table; check [`Self::exists`].
    pub async fn load(
        conn: &mut SqliteConnection,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Self, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1, ?2) ORDER BY cid",
        )
        .bind(table)
        .bind(schema.unwrap_or("main"))
        .fetch_all(&mut *conn)
        .await?;

        let columns = rows
            .iter()
            .map(|row| -> Result<ColumnMetaData, sqlx::Error> {
                let declared_type: String = row.try_get("type")?;
                Ok(ColumnMetaData {
                    name: row.try_get("name")?,
                    column_type: ColumnType::from_declared(&declared_type),
                    declared_type,
                    not_null: row.try_get::<i64, _>("notnull")? != 0,
                    primary_key: row.try_get::<i64, _>("pk")? != 0,
                    has_default: row.try_get::<Option<String>, _>("dflt_value")?.is_some(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Loaded {} column(s) for {}",
            columns.len(),
            qualified_name(schema, table)
        );

        Ok(Self {
            schema: schema.map(str::to_string),
            table: table.to_string(),
            columns,
        })
    }

    /// Whether SQLite reported the table at all.
    pub fn exists(&self) -> bool {
        !self.columns.is_empty()
    }

    /// `schema.table`, or just `table`.
    pub fn qualified_name(&self) -> String {
        qualified_name(self.schema.as_deref(), &self.table)
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[ColumnMetaData] {
        &self.columns
    }

    /// Column named `name`, compared case-insensitively like SQLite does.
    pub fn column(&self, name: &str) -> Option<&ColumnMetaData> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a configured column, failing with a configuration error if absent.
    pub fn require_column(&self, name: &str) -> Result<&ColumnMetaData, ConfigurationError> {
        self.column(name)
            .ok_or_else(|| ConfigurationError::ColumnNotFound {
                table: self.qualified_name(),
                column: name.to_string(),
            })
    }
}

/// `schema.table`, or just `table`.
pub fn qualified_name(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{schema}.{table}"),
        None => table.to_string(),
    }
}

/// Checks that `name` is a plain identifier (ASCII letter or underscore,
/// then letters, digits or underscores) and returns it double-quoted.
pub fn quote_identifier(name: &str) -> Result<String, ConfigurationError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(format!("\"{name}\""))
    } else {
        Err(ConfigurationError::InvalidIdentifier(name.to_string()))
    }
}
