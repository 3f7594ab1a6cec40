use crate::error::{Error, Result};
use crate::models::RowSet;

use super::ReportEncoder;

/// CSV with standard quoting: fields holding a comma, quote or newline are
/// quoted and embedded quotes are doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvEncoder;

impl ReportEncoder for CsvEncoder {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn encode(&self, rows: &RowSet) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(rows.columns())?;
        for row in rows.rows() {
            writer.write_record(row.values().iter().map(|v| v.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::encoding(format!("csv: {}", e.error())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportValue;

    fn decode(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let records = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, records)
    }

    #[test]
    fn test_header_then_rows() {
        let mut rows = RowSet::new(["branch", "total_students", "avg_ctc"]);
        rows.push_row(vec!["CSE".into(), 3i64.into(), 750000.5f64.into()])
            .unwrap();
        rows.push_row(vec!["ECE".into(), 2i64.into(), ReportValue::Null])
            .unwrap();

        let text = String::from_utf8(CsvEncoder.encode(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["branch,total_students,avg_ctc", "CSE,3,750000.5", "ECE,2,"]
        );
    }

    #[test]
    fn test_roundtrip_recovers_columns_and_values() {
        let mut rows = RowSet::new(["name", "company_name", "ctc"]);
        rows.push_row(vec!["Asha".into(), "TechCorp".into(), 1200000.0f64.into()])
            .unwrap();

        let (headers, records) = decode(&CsvEncoder.encode(&rows).unwrap());
        assert_eq!(headers, vec!["name", "company_name", "ctc"]);
        assert_eq!(records, vec![vec!["Asha", "TechCorp", "1200000"]]);
    }

    #[test]
    fn test_quotes_fields_with_delimiters() {
        let mut rows = RowSet::new(["company_name", "role"]);
        rows.push_row(vec!["Acme, Inc.".into(), "Engineer \"II\"\nBackend".into()])
            .unwrap();

        let bytes = CsvEncoder.encode(&rows).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\"Acme, Inc.\""));
        assert!(text.contains("\"Engineer \"\"II\"\"\nBackend\""));

        let (_, records) = decode(&bytes);
        assert_eq!(records[0], vec!["Acme, Inc.", "Engineer \"II\"\nBackend"]);
    }

    #[test]
    fn test_empty_rows_write_header_only() {
        let rows = RowSet::new(["batch_year", "total_students"]);
        let text = String::from_utf8(CsvEncoder.encode(&rows).unwrap()).unwrap();
        assert_eq!(text, "batch_year,total_students\n");
    }
}
