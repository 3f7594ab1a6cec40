//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod report;
pub mod token;

use crate::output::OutputFormat;
use placement_core::Database;

/// Shared context for database-backed commands
pub struct Context {
    pub db: Database,
    pub format: OutputFormat,
    pub quiet: bool,
}
