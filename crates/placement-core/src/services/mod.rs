//! Report services
//!
//! - `fetcher` - runs the per-type SQL and shapes rows into a [`RowSet`](crate::RowSet)
//! - `encoders` - PDF, Excel and CSV serialization
//! - `report` - orchestrates fetch then encode

pub mod encoders;
pub mod fetcher;
pub mod report;

pub use encoders::{CsvEncoder, ExcelEncoder, PdfEncoder, ReportEncoder};
pub use fetcher::ReportSource;
pub use report::ReportService;
