//! Administrative reporting routes.
//!
//! Both endpoints read the enrollments' persisted aggregate fields; the
//! balance formula lives only in the reconciliation engine.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use academe_core::reports::{CollectionsReport, render_collections_csv};
use academe_db::{
    entities::sea_orm_active_enums::BalanceStatus,
    repositories::report::{ReportError, ReportFilter, ReportRepository},
};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/collections", get(collections_report))
        .route("/reports/collections.csv", get(collections_report_csv))
}

/// Query parameters for the collections report.
#[derive(Debug, Deserialize)]
pub struct CollectionsQuery {
    /// Filter by program.
    pub program: Option<Uuid>,
    /// Filter by settlement status.
    pub status: Option<String>,
    /// Filter by enrollment date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by enrollment date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

fn build_filter(query: &CollectionsQuery) -> ReportFilter {
    ReportFilter {
        program_id: query.program,
        payment_status: query.status.as_deref().and_then(|s| match s {
            "pending" => Some(BalanceStatus::Pending),
            "partial" => Some(BalanceStatus::Partial),
            "paid" => Some(BalanceStatus::Paid),
            _ => None,
        }),
        from: query.from,
        to: query.to,
    }
}

fn report_error_response(e: &ReportError) -> axum::response::Response {
    error!(error = %e, "Failed to build report");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// GET `/reports/collections` - Collections report as JSON.
async fn collections_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CollectionsQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new((*state.db).clone());

    match repo.collection_rows(build_filter(&query)).await {
        Ok(rows) => {
            let report = CollectionsReport::from_rows(Utc::now().date_naive(), rows);
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => report_error_response(&e),
    }
}

/// GET `/reports/collections.csv` - Collections report as CSV download.
async fn collections_report_csv(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<CollectionsQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new((*state.db).clone());

    match repo.collection_rows(build_filter(&query)).await {
        Ok(rows) => {
            let report = CollectionsReport::from_rows(Utc::now().date_naive(), rows);
            let csv = render_collections_csv(&report);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"collections.csv\"",
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => report_error_response(&e),
    }
}
