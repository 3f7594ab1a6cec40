//! Output formatting module
//!
//! Provides table and JSON output for report rows.

use placement_core::RowSet;
use std::fmt::Display;
use tabled::builder::Builder;

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use 'table' or 'json'", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render report rows in the specified format
pub fn render_rows(rows: &RowSet, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("No records found.".to_string());
            }
            let mut builder = Builder::default();
            builder.push_record(rows.columns().iter().cloned());
            for row in rows.rows() {
                builder.push_record(row.values().iter().map(|v| v.to_string()));
            }
            Ok(builder.build().to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

/// Print report rows in the specified format
pub fn print_rows(rows: &RowSet, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_rows(rows, format)?);
    Ok(())
}

/// Print a success message (respects quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", colored::Colorize::green(message));
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{}", colored::Colorize::yellow(message));
}

/// Print an info message (respects quiet mode)
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}
