//! Application initialization.
//!
//! Logger setup for the binary; the database pool is set up by
//! [`crate::storage::init_db_pool_with_config`].

mod logger;

// Re-export public API
pub use logger::init_logger_with;
