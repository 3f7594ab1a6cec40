//! Reports API routes

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use placement_core::{authenticate_student, authorize, ReportRequest};
use uuid::Uuid;

use super::ApiError;
use crate::AppState;

/// Reports routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/download", post(download))
}

/// Generate a report and stream it back as an attachment.
///
/// The caller is authenticated before the body is read.
async fn download(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let claims = authenticate_student(&state.keys, authorization)?;

    let request: ReportRequest = serde_json::from_slice(&body).map_err(|e| {
        log::debug!("Rejected report payload: {}", e);
        ApiError::MalformedPayload
    })?;

    authorize(&claims, &request)?;

    let request_id = Uuid::new_v4();
    log::info!(
        "[{}] {} requested {} report as {}",
        request_id,
        claims.sub,
        request.report_type,
        request.format
    );

    let buffer = state.reports.generate(&request).await.map_err(|e| {
        log::error!("[{}] Report generation failed", request_id);
        ApiError::from(e)
    })?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, buffer.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", buffer.file_name()),
        )
        .body(Body::from(buffer.into_bytes()))
        .map_err(|e| {
            log::error!("[{}] Failed to build response: {}", request_id, e);
            ApiError::ReportFailed
        })?;

    Ok(response)
}
