use crate::infra::AppState;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use medfit::error::AppError;
use medfit::workflows::catalog::{write_companies, CompanyCatalogImporter};
use medfit::workflows::diagnosis::{diagnosis_router, DiagnosisService, SessionStore};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

/// Header carrying how many labeled rows still need manual review.
pub(crate) const NEEDS_REVIEW_HEADER: &str = "x-needs-review";

pub(crate) fn with_service_routes<S>(
    service: Arc<DiagnosisService<S>>,
    survey_token: Option<String>,
) -> axum::Router
where
    S: SessionStore + 'static,
{
    diagnosis_router(service, survey_token)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/companies/label",
            axum::routing::post(label_companies_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Labels and scores a company CSV posted as the request body and answers
/// with the enriched table in the same column layout.
pub(crate) async fn label_companies_endpoint(
    Extension(state): Extension<AppState>,
    body: String,
) -> Result<Response, AppError> {
    let records = CompanyCatalogImporter::from_reader(Cursor::new(body.into_bytes()))?;
    let run = state.labeling.run(records);
    let pending = run.needs_review().count();

    info!(
        companies = run.records.len(),
        relabeled = run.relabeled(),
        pending,
        "labeled posted company table"
    );

    let mut output = Vec::new();
    write_companies(&mut output, &run.records)?;

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        output,
    )
        .into_response();
    response
        .headers_mut()
        .insert(NEEDS_REVIEW_HEADER, HeaderValue::from(pending));
    Ok(response)
}
