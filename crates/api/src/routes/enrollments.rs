//! Enrollment management routes.
//!
//! Reads return the persisted aggregate fields written by reconciliation;
//! no balance is ever recomputed here.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use academe_db::{
    entities::{enrollments, sea_orm_active_enums::BalanceStatus},
    repositories::enrollment::{
        CreateEnrollmentInput, EnrollmentError, EnrollmentFilter, EnrollmentRepository,
    },
};
use academe_shared::types::pagination::{PageRequest, PageResponse};

/// Creates the enrollment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list_enrollments))
        .route("/enrollments", post(create_enrollment))
        .route("/enrollments/{enrollment_id}", get(get_enrollment))
        .route("/enrollments/{enrollment_id}", delete(delete_enrollment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing enrollments.
#[derive(Debug, Deserialize)]
pub struct ListEnrollmentsQuery {
    /// Filter by student.
    pub student: Option<Uuid>,
    /// Filter by program.
    pub program: Option<Uuid>,
    /// Filter by settlement status.
    pub status: Option<String>,
    /// Filter by enrollment date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by enrollment date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating an enrollment.
#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    /// Student enrolling.
    pub student_id: Uuid,
    /// Program enrolled into.
    pub program_id: Uuid,
    /// Enrollment date (YYYY-MM-DD).
    pub enrolled_on: NaiveDate,
    /// Agreed total (decimal string); defaults to the program fee.
    pub total_value: Option<String>,
}

/// Response for an enrollment.
#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    /// Enrollment ID.
    pub id: Uuid,
    /// Student ID.
    pub student_id: Uuid,
    /// Program ID.
    pub program_id: Uuid,
    /// Effective total value.
    pub total_value: String,
    /// Sum of completed payments.
    pub total_paid: String,
    /// Amount still owed.
    pub remaining_balance: String,
    /// Settlement status.
    pub payment_status: String,
    /// Enrollment date.
    pub enrolled_on: String,
    /// Created at timestamp.
    pub created_at: String,
}

fn enrollment_response(model: enrollments::Model) -> EnrollmentResponse {
    EnrollmentResponse {
        id: model.id,
        student_id: model.student_id,
        program_id: model.program_id,
        total_value: model.total_value.to_string(),
        total_paid: model.total_paid.to_string(),
        remaining_balance: model.remaining_balance.to_string(),
        payment_status: balance_status_to_string(&model.payment_status),
        enrolled_on: model.enrolled_on.to_string(),
        created_at: model.created_at.to_rfc3339(),
    }
}

fn balance_status_to_string(status: &BalanceStatus) -> String {
    match status {
        BalanceStatus::Pending => "pending",
        BalanceStatus::Partial => "partial",
        BalanceStatus::Paid => "paid",
    }
    .to_string()
}

fn string_to_balance_status(s: &str) -> Option<BalanceStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(BalanceStatus::Pending),
        "partial" => Some(BalanceStatus::Partial),
        "paid" => Some(BalanceStatus::Paid),
        _ => None,
    }
}

fn enrollment_error_response(e: &EnrollmentError) -> axum::response::Response {
    match e {
        EnrollmentError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Enrollment not found"
            })),
        )
            .into_response(),
        EnrollmentError::StudentNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "student_not_found",
                "message": format!("Student not found: {id}")
            })),
        )
            .into_response(),
        EnrollmentError::ProgramNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "program_not_found",
                "message": format!("Program not found: {id}")
            })),
        )
            .into_response(),
        EnrollmentError::ProgramInactive(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "program_inactive",
                "message": "Program is no longer accepting enrollments"
            })),
        )
            .into_response(),
        EnrollmentError::NegativeTotalValue(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_total_value",
                "message": "Total value must not be negative"
            })),
        )
            .into_response(),
        EnrollmentError::HasPayments(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "has_payments",
                "message": "Enrollments with payments on record cannot be deleted"
            })),
        )
            .into_response(),
        EnrollmentError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/enrollments` - List enrollments with filters.
async fn list_enrollments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListEnrollmentsQuery>,
) -> impl IntoResponse {
    let repo = EnrollmentRepository::new((*state.db).clone());

    let filter = EnrollmentFilter {
        student_id: query.student,
        program_id: query.program,
        payment_status: query.status.as_deref().and_then(string_to_balance_status),
        from: query.from,
        to: query.to,
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20).min(100),
    };

    match repo.list_enrollments(filter, &page).await {
        Ok((rows, total)) => {
            let items: Vec<EnrollmentResponse> =
                rows.into_iter().map(enrollment_response).collect();
            let response = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list enrollments");
            enrollment_error_response(&e)
        }
    }
}

/// POST `/enrollments` - Enroll a student into a program.
async fn create_enrollment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateEnrollmentRequest>,
) -> impl IntoResponse {
    let total_value = match payload.total_value.as_deref() {
        None => None,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(v) if v >= Decimal::ZERO => Some(v),
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_total_value",
                        "message": "Total value must be a non-negative decimal"
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = EnrollmentRepository::new((*state.db).clone());
    let input = CreateEnrollmentInput {
        student_id: payload.student_id,
        program_id: payload.program_id,
        enrolled_on: payload.enrolled_on,
        total_value,
    };

    match repo.create_enrollment(input).await {
        Ok(enrollment) => {
            info!(
                enrollment_id = %enrollment.id,
                student_id = %enrollment.student_id,
                "Student enrolled"
            );
            (StatusCode::CREATED, Json(enrollment_response(enrollment))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create enrollment");
            enrollment_error_response(&e)
        }
    }
}

/// GET `/enrollments/{enrollment_id}` - Get an enrollment with its aggregates.
async fn get_enrollment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = EnrollmentRepository::new((*state.db).clone());

    match repo.get_enrollment(enrollment_id).await {
        Ok(enrollment) => (StatusCode::OK, Json(enrollment_response(enrollment))).into_response(),
        Err(e) => enrollment_error_response(&e),
    }
}

/// DELETE `/enrollments/{enrollment_id}` - Delete an enrollment without payments.
async fn delete_enrollment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = EnrollmentRepository::new((*state.db).clone());

    match repo.delete_enrollment(enrollment_id).await {
        Ok(()) => {
            info!(enrollment_id = %enrollment_id, "Enrollment deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete enrollment");
            enrollment_error_response(&e)
        }
    }
}
