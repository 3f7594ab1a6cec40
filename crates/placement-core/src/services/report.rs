//! Report orchestration: validate, fetch, encode.

use crate::error::Result;
use crate::models::{ReportBuffer, ReportFormat, ReportRequest};

use super::fetcher::ReportSource;

/// Generates report documents from a row source
pub struct ReportService<S> {
    source: S,
}

impl<S: ReportSource> ReportService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the pipeline for one request.
    ///
    /// An unknown `type` or a missing scoping field fails before the store is
    /// queried; an unknown `format` fails after the fetch and before encoding.
    pub async fn generate(&self, request: &ReportRequest) -> Result<ReportBuffer> {
        let scope = request.scope()?;
        log::info!("Generating {} report as {}", scope.report_type(), request.format);

        let rows = self.source.fetch(&scope).await?;

        let format: ReportFormat = request.format.parse()?;
        let bytes = format.encoder().encode(&rows)?;

        log::info!(
            "Generated {} report: {} row(s), {} bytes of {}",
            scope.report_type(),
            rows.len(),
            bytes.len(),
            format.content_type()
        );
        Ok(ReportBuffer::new(format, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{ReportScope, ReportValue, RowSet};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts how often it is queried
    #[derive(Default)]
    struct StubSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReportSource for StubSource {
        async fn fetch(&self, scope: &ReportScope) -> Result<RowSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = RowSet::new(["scope", "total_students"]);
            rows.push_row(vec![
                ReportValue::Text(scope.report_type().to_string()),
                ReportValue::Integer(3),
            ])?;
            Ok(rows)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ReportSource for FailingSource {
        async fn fetch(&self, _scope: &ReportScope) -> Result<RowSet> {
            Err(Error::StoreUnavailable(sqlx::Error::PoolTimedOut))
        }
    }

    fn calls(service: &ReportService<StubSource>) -> usize {
        service.source().calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_every_valid_pair_yields_matching_content_type() {
        let service = ReportService::new(StubSource::default());
        let requests = [
            ReportRequest::new("individual", "").with_student_id("1"),
            ReportRequest::new("branch", "").with_branch("CSE"),
            ReportRequest::new("batch", "").with_year("2024"),
        ];

        for base in requests {
            for format in ReportFormat::ALL {
                let mut request = base.clone();
                request.format = format.as_str().to_string();
                let buffer = service.generate(&request).await.unwrap();
                assert_eq!(buffer.format(), format);
                assert_eq!(buffer.content_type(), format.content_type());
                assert!(!buffer.bytes().is_empty());
            }
        }
        assert_eq!(calls(&service), 9);
    }

    #[tokio::test]
    async fn test_unknown_type_fails_before_query() {
        let service = ReportService::new(StubSource::default());
        let request = ReportRequest::new("department", "csv");

        let err = service.generate(&request).await.unwrap_err();
        assert!(matches!(err, Error::InvalidReportType(t) if t == "department"));
        assert_eq!(calls(&service), 0);
    }

    #[tokio::test]
    async fn test_missing_parameter_fails_before_query() {
        let service = ReportService::new(StubSource::default());
        let request = ReportRequest::new("batch", "csv");

        let err = service.generate(&request).await.unwrap_err();
        assert!(matches!(err, Error::MissingParameter { field: "year", .. }));
        assert_eq!(calls(&service), 0);
    }

    #[tokio::test]
    async fn test_unknown_format_fails_after_fetch() {
        let service = ReportService::new(StubSource::default());
        let request = ReportRequest::new("branch", "json").with_branch("CSE");

        let err = service.generate(&request).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(f) if f == "json"));
        assert_eq!(calls(&service), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let service = ReportService::new(FailingSource);
        let request = ReportRequest::new("branch", "csv").with_branch("CSE");

        let err = service.generate(&request).await.unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_csv_output_carries_fetched_rows() {
        let service = ReportService::new(StubSource::default());
        let request = ReportRequest::new("branch", "csv").with_branch("CSE");

        let buffer = service.generate(&request).await.unwrap();
        let text = String::from_utf8(buffer.into_bytes()).unwrap();
        assert_eq!(text, "scope,total_students\nbranch,3\n");
    }
}
