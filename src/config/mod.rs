//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (database path, todo table layout)
//! - Database configuration
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{DatabaseConfig, LogFormat, LogLevel, Opt, OutputFormat};
