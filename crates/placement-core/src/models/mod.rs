//! Data models for the placement report pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Scope a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Individual,
    Branch,
    Batch,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Individual => "individual",
            ReportType::Branch => "branch",
            ReportType::Batch => "batch",
        }
    }
}

impl FromStr for ReportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "individual" => Ok(ReportType::Individual),
            "branch" => Ok(ReportType::Branch),
            "batch" => Ok(ReportType::Batch),
            other => Err(Error::InvalidReportType(other.to_string())),
        }
    }
}

impl Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output serialization of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Pdf, ReportFormat::Excel, ReportFormat::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "excel",
            ReportFormat::Csv => "csv",
        }
    }

    /// MIME type sent with the download
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Csv => "text/csv",
        }
    }

    /// Download file name, `placement_report.<format>`
    pub fn file_name(&self) -> String {
        format!("placement_report.{}", self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pdf" => Ok(ReportFormat::Pdf),
            "excel" => Ok(ReportFormat::Excel),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report request as it arrives on the wire.
///
/// `type` and `format` stay strings until [`ReportRequest::scope`] and
/// [`ReportFormat::from_str`] validate them, so unknown values surface as
/// [`Error::InvalidReportType`] / [`Error::UnsupportedFormat`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(rename = "type")]
    pub report_type: String,
    pub format: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

impl ReportRequest {
    pub fn new(report_type: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            report_type: report_type.into(),
            format: format.into(),
            ..Default::default()
        }
    }

    pub fn with_student_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Resolve the validated scope. Only the field relevant to `type` is read.
    pub fn scope(&self) -> Result<ReportScope> {
        let report_type: ReportType = self.report_type.parse()?;
        let scope = match report_type {
            ReportType::Individual => ReportScope::Individual {
                student_id: required(&self.student_id, report_type, "studentId")?,
            },
            ReportType::Branch => ReportScope::Branch {
                branch: required(&self.branch, report_type, "branch")?,
            },
            ReportType::Batch => ReportScope::Batch {
                year: required(&self.year, report_type, "year")?,
            },
        };
        Ok(scope)
    }
}

fn required(value: &Option<String>, report_type: ReportType, field: &'static str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::MissingParameter {
            report_type: report_type.as_str(),
            field,
        }),
    }
}

/// Validated scoping parameters for one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    Individual { student_id: String },
    Branch { branch: String },
    Batch { year: String },
}

impl ReportScope {
    pub fn report_type(&self) -> ReportType {
        match self {
            ReportScope::Individual { .. } => ReportType::Individual,
            ReportScope::Branch { .. } => ReportType::Branch,
            ReportScope::Batch { .. } => ReportType::Batch,
        }
    }
}

/// A single scalar cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
}

impl ReportValue {
    /// Text cell, promoted to a date when it is an ISO `YYYY-MM-DD` string
    pub fn from_text(text: String) -> Self {
        match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
            Ok(date) if text.len() == 10 => ReportValue::Date(date),
            _ => ReportValue::Text(text),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ReportValue::Null)
    }
}

impl Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Null => Ok(()),
            ReportValue::Integer(v) => write!(f, "{}", v),
            ReportValue::Real(v) => write!(f, "{}", v),
            ReportValue::Text(v) => f.write_str(v),
            ReportValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for ReportValue {
    fn from(v: &str) -> Self {
        ReportValue::Text(v.to_string())
    }
}

impl From<String> for ReportValue {
    fn from(v: String) -> Self {
        ReportValue::Text(v)
    }
}

impl From<i64> for ReportValue {
    fn from(v: i64) -> Self {
        ReportValue::Integer(v)
    }
}

impl From<f64> for ReportValue {
    fn from(v: f64) -> Self {
        ReportValue::Real(v)
    }
}

impl From<NaiveDate> for ReportValue {
    fn from(v: NaiveDate) -> Self {
        ReportValue::Date(v)
    }
}

impl<T: Into<ReportValue>> From<Option<T>> for ReportValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ReportValue::Null)
    }
}

/// One row, positionally aligned with its [`RowSet`] columns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReportRow {
    values: Vec<ReportValue>,
}

impl ReportRow {
    pub fn values(&self) -> &[ReportValue] {
        &self.values
    }
}

/// Ordered rows sharing one fixed column list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<ReportRow>,
}

impl RowSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row whose values are already in column order
    pub fn push_row(&mut self, values: Vec<ReportValue>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::validation(format!(
                "row has {} values but the report has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(ReportRow { values });
        Ok(())
    }

    /// Iterate `(column, value)` pairs of each row
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &ReportValue)>> + '_ {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.values.iter())
                .collect()
        })
    }
}

/// Finished report bytes plus their MIME type
#[derive(Debug, Clone)]
pub struct ReportBuffer {
    format: ReportFormat,
    bytes: Vec<u8>,
}

impl ReportBuffer {
    pub fn new(format: ReportFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn file_name(&self) -> String {
        self.format.file_name()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// JWT claims carried by the bearer credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // student id
    pub role: String,
    pub exp: i64,
}
