use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use pbb_review::config::AnalysisConfig;
use pbb_review::error::AppError;
use pbb_review::ingest::{SheetKind, WorkbookImporter};
use pbb_review::review::{BudgetDataset, FilterSelection, ReviewReport};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

/// One workbook upload: per-sheet CSV payloads (all optional; missing sheets
/// behave like missing workbook tabs) plus the active filter selection.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReviewReportRequest {
    #[serde(default)]
    pub(crate) request_summary_csv: Option<String>,
    #[serde(default)]
    pub(crate) personnel_csv: Option<String>,
    #[serde(default)]
    pub(crate) non_personnel_csv: Option<String>,
    #[serde(default)]
    pub(crate) request_qa_csv: Option<String>,
    #[serde(default)]
    pub(crate) budget_summary_csv: Option<String>,
    #[serde(default)]
    pub(crate) filters: FilterSelection,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewReportResponse {
    pub(crate) generated_on: NaiveDate,
    #[serde(flatten)]
    pub(crate) report: ReviewReport,
}

pub(crate) fn router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/review/report",
            axum::routing::post(review_report_endpoint),
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

pub(crate) async fn review_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ReviewReportRequest>,
) -> Result<Json<ReviewReportResponse>, AppError> {
    let report = build_report(payload, &state.analysis)?;
    Ok(Json(ReviewReportResponse {
        generated_on: Local::now().date_naive(),
        report,
    }))
}

fn build_report(
    payload: ReviewReportRequest,
    analysis: &AnalysisConfig,
) -> Result<ReviewReport, AppError> {
    let ReviewReportRequest {
        request_summary_csv,
        personnel_csv,
        non_personnel_csv,
        request_qa_csv,
        budget_summary_csv,
        filters,
    } = payload;

    let mut dataset = BudgetDataset::default();
    dataset.request_summary = read_optional_sheet(SheetKind::RequestSummary, request_summary_csv)?;
    dataset.personnel = read_optional_sheet(SheetKind::Personnel, personnel_csv)?;
    dataset.non_personnel = read_optional_sheet(SheetKind::NonPersonnel, non_personnel_csv)?;
    dataset.request_qa = read_optional_sheet(SheetKind::RequestQa, request_qa_csv)?;
    dataset.budget_summary = read_optional_sheet(SheetKind::BudgetSummary, budget_summary_csv)?;

    Ok(ReviewReport::build(&dataset, &filters, analysis))
}

fn read_optional_sheet(
    kind: SheetKind,
    csv: Option<String>,
) -> Result<Vec<pbb_review::review::Record>, AppError> {
    match csv {
        Some(csv) => {
            let records = WorkbookImporter::read_sheet(kind, Cursor::new(csv.into_bytes()))?;
            Ok(records)
        }
        None => Ok(Vec::new()),
    }
}
