//! # placement-core
//!
//! Core report pipeline for the placement tracker - shared between CLI and server.
//!
//! This crate provides:
//! - Database handle and schema bootstrap (`db` module)
//! - Report data model (`models` module)
//! - Data fetching, format encoding and orchestration (`services` module)
//! - Bearer token verification and report authorization (`auth` module)
//! - Unified error handling (`error` module)

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

// Re-exports for convenience
pub use auth::{authenticate_student, authorize, bearer_token, load_jwt_secret, TokenKeys};
pub use db::Database;
pub use error::{Error, Result};

pub use models::{
    Claims, ReportBuffer, ReportFormat, ReportRequest, ReportRow, ReportScope, ReportType,
    ReportValue, RowSet,
};

pub use services::{
    CsvEncoder, ExcelEncoder, PdfEncoder, ReportEncoder, ReportService, ReportSource,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
