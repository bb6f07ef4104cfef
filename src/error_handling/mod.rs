//! Error handling.
//!
//! Errors are categorized into:
//! - **Initialization**: logger setup
//! - **Database**: pool, file and migration setup
//! - **Insert**: configuration, binding, constraint and database failures

mod types;

// Re-export public API
pub use types::{
    BindingError, ConfigurationError, DatabaseError, InitializationError, InsertError,
};
