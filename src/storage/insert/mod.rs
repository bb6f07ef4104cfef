//! Table inserts.
//!
//! - `metadata`: column metadata loaded from SQLite
//! - `value`: row values and their conversions
//! - `table`: the generic compiled table insert
//! - `todo`: the insert configured for `sandbox.t_todo`

mod metadata;
mod table;
mod todo;
mod value;

pub use metadata::{quote_identifier, ColumnMetaData, ColumnType, TableMetaData};
pub use table::{KeyHolder, TableConfig, TableInsert, TableInsertBuilder};
pub use todo::TodoInserter;
pub use value::{InsertRow, Value};
