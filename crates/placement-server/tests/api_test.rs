//! Integration tests for the report download route
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`,
//! so no socket is opened.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use placement_core::{Database, TokenKeys};
use placement_server::{create_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &[u8] = b"integration-test-secret-at-least-32-bytes";

/// Router backed by a fresh database seeded with one placed student
async fn create_test_app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open(temp_dir.path().join("test.db"))
        .await
        .expect("Failed to create test database");

    sqlx::query(
        "INSERT INTO students (id, name, email, branch, batch_year, cgpa, placement_status) VALUES ('1', 'Asha', 'asha@college.edu', 'CSE', 2024, 8.5, 'Placed')",
    )
    .execute(&db.pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO placements (id, student_id, company_name, role, ctc, offer_date) VALUES ('p-1', '1', 'TechCorp', 'SDE', 1200000, '2024-03-15')",
    )
    .execute(&db.pool)
    .await
    .unwrap();

    let app = create_router(AppState::new(db, TokenKeys::new(SECRET)));
    (app, temp_dir)
}

fn token(sub: &str, role: &str) -> String {
    TokenKeys::new(SECRET).issue(sub, role).unwrap()
}

fn download(body: Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/reports/download")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn error_message(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    value["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = create_test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_credential_is_401() {
    let (app, _dir) = create_test_app().await;
    let response = app
        .oneshot(download(json!({"type": "branch", "format": "csv", "branch": "CSE"}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_credential_is_401() {
    let (app, _dir) = create_test_app().await;
    let forged = TokenKeys::new(b"some-other-secret-also-32-bytes-long").issue("1", "student").unwrap();
    let response = app
        .oneshot(download(
            json!({"type": "branch", "format": "csv", "branch": "CSE"}),
            Some(&forged),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_student_role_is_403() {
    let (app, _dir) = create_test_app().await;
    let response = app
        .oneshot(download(
            json!({"type": "branch", "format": "csv", "branch": "CSE"}),
            Some(&token("1", "admin")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_other_students_individual_report_is_403() {
    let (app, _dir) = create_test_app().await;
    let response = app
        .oneshot(download(
            json!({"type": "individual", "format": "csv", "studentId": "1"}),
            Some(&token("2", "student")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_message(response).await, "Unauthorized access to report");
}

#[tokio::test]
async fn test_individual_csv_download() {
    let (app, _dir) = create_test_app().await;
    let response = app
        .oneshot(download(
            json!({"type": "individual", "format": "csv", "studentId": "1"}),
            Some(&token("1", "student")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=placement_report.csv"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("TechCorp"));
    assert!(lines[1].contains("1200000"));
}

#[tokio::test]
async fn test_every_format_sets_content_type() {
    let cases = [
        ("pdf", "application/pdf"),
        (
            "excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
        ("csv", "text/csv"),
    ];

    for (format, content_type) in cases {
        let (app, _dir) = create_test_app().await;
        let response = app
            .oneshot(download(
                json!({"type": "batch", "format": format, "year": "2024"}),
                Some(&token("1", "student")),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "format {}", format);
        assert_eq!(response.headers()[header::CONTENT_TYPE], content_type);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=placement_report.{}", format).as_str()
        );
    }
}

#[tokio::test]
async fn test_unknown_type_is_generic_500() {
    let (app, _dir) = create_test_app().await;
    let response = app
        .oneshot(download(
            json!({"type": "department", "format": "csv"}),
            Some(&token("1", "student")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(response).await, "Failed to generate report");
}

#[tokio::test]
async fn test_unknown_format_is_500() {
    let (app, _dir) = create_test_app().await;
    let response = app
        .oneshot(download(
            json!({"type": "branch", "format": "json", "branch": "CSE"}),
            Some(&token("1", "student")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let (app, _dir) = create_test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/reports/download")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("1", "student")))
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
