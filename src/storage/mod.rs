// storage/mod.rs
// Database operations module

pub mod insert;
pub mod migrations;
pub mod pool;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use insert::{
    ColumnMetaData, ColumnType, InsertRow, KeyHolder, TableConfig, TableInsert,
    TableInsertBuilder, TableMetaData, TodoInserter, Value,
};
pub use migrations::run_migrations;
pub use pool::{init_db_pool, init_db_pool_with_config};
