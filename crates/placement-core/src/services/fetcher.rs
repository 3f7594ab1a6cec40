//! Report data fetching
//!
//! Each report type maps to one fixed, parameterized query. The column list is
//! taken from the prepared statement, so an empty result still carries its
//! header.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};

use crate::db::Database;
use crate::error::Result;
use crate::models::{ReportScope, ReportValue, RowSet};

/// Student record joined with its most recent placement, if any
const INDIVIDUAL_QUERY: &str = r#"
    SELECT s.*, p.company_name, p.role, p.ctc, p.offer_date
    FROM students s
    LEFT JOIN placements p ON s.id = p.student_id
    WHERE s.id = ?
    ORDER BY p.offer_date DESC
    LIMIT 1
"#;

const BRANCH_QUERY: &str = r#"
    SELECT s.branch,
           COUNT(*) AS total_students,
           COUNT(p.id) AS placed_students,
           AVG(p.ctc) AS avg_ctc,
           MAX(p.ctc) AS highest_ctc
    FROM students s
    LEFT JOIN placements p ON s.id = p.student_id
    WHERE s.branch = ?
    GROUP BY s.branch
"#;

const BATCH_QUERY: &str = r#"
    SELECT s.batch_year,
           COUNT(*) AS total_students,
           COUNT(p.id) AS placed_students,
           AVG(p.ctc) AS avg_ctc,
           MAX(p.ctc) AS highest_ctc
    FROM students s
    LEFT JOIN placements p ON s.id = p.student_id
    WHERE s.batch_year = ?
    GROUP BY s.batch_year
"#;

/// Read-only source of report rows
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch(&self, scope: &ReportScope) -> Result<RowSet>;
}

#[async_trait]
impl ReportSource for Database {
    async fn fetch(&self, scope: &ReportScope) -> Result<RowSet> {
        let (sql, param) = match scope {
            ReportScope::Individual { student_id } => (INDIVIDUAL_QUERY, student_id.clone()),
            ReportScope::Branch { branch } => (BRANCH_QUERY, branch.clone()),
            ReportScope::Batch { year } => (BATCH_QUERY, year.clone()),
        };

        let statement = (&self.pool).prepare(sql).await?;
        let mut rows = RowSet::new(statement.columns().iter().map(|c| c.name().to_string()));

        let records = statement.query().bind(param).fetch_all(&self.pool).await?;
        for record in &records {
            rows.push_row(decode_row(record)?)?;
        }

        log::debug!(
            "Fetched {} row(s) x {} column(s) for {} report",
            rows.len(),
            rows.columns().len(),
            scope.report_type()
        );
        Ok(rows)
    }
}

fn decode_row(row: &SqliteRow) -> Result<Vec<ReportValue>> {
    (0..row.columns().len())
        .map(|idx| decode_value(row, idx))
        .collect()
}

/// Decode by the value's runtime storage class rather than the declared type,
/// since aggregates like `AVG` have no declared type.
fn decode_value(row: &SqliteRow, idx: usize) -> Result<ReportValue> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(ReportValue::Null);
    }
    let kind = raw.type_info().name().to_string();

    let value = match kind.as_str() {
        "INTEGER" | "BOOLEAN" => ReportValue::Integer(row.try_get::<i64, _>(idx)?),
        "REAL" | "NUMERIC" => ReportValue::Real(row.try_get::<f64, _>(idx)?),
        _ => ReportValue::from_text(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}
