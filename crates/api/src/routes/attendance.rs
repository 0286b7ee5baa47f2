//! Attendance routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use academe_db::{
    entities::{attendance_records, sea_orm_active_enums::AttendanceStatus},
    repositories::attendance::{AttendanceError, AttendanceRepository, RecordAttendanceInput},
};

/// Creates the attendance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments/{enrollment_id}/attendance", get(list_attendance))
        .route("/enrollments/{enrollment_id}/attendance", post(record_attendance))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording attendance.
#[derive(Debug, Deserialize)]
pub struct RecordAttendanceRequest {
    /// Session date (YYYY-MM-DD).
    pub session_date: NaiveDate,
    /// Attendance outcome: present, absent, late, or excused.
    pub status: String,
    /// Free-form remarks.
    pub remarks: Option<String>,
}

/// Response for an attendance record.
#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    /// Record ID.
    pub id: Uuid,
    /// Enrollment ID.
    pub enrollment_id: Uuid,
    /// Session date.
    pub session_date: String,
    /// Attendance outcome.
    pub status: String,
    /// Remarks.
    pub remarks: Option<String>,
    /// Staff member who recorded.
    pub recorded_by: Uuid,
}

fn attendance_response(model: attendance_records::Model) -> AttendanceResponse {
    AttendanceResponse {
        id: model.id,
        enrollment_id: model.enrollment_id,
        session_date: model.session_date.to_string(),
        status: status_to_string(&model.status),
        remarks: model.remarks,
        recorded_by: model.recorded_by,
    }
}

fn status_to_string(status: &AttendanceStatus) -> String {
    match status {
        AttendanceStatus::Present => "present",
        AttendanceStatus::Absent => "absent",
        AttendanceStatus::Late => "late",
        AttendanceStatus::Excused => "excused",
    }
    .to_string()
}

fn string_to_status(s: &str) -> Option<AttendanceStatus> {
    match s.to_lowercase().as_str() {
        "present" => Some(AttendanceStatus::Present),
        "absent" => Some(AttendanceStatus::Absent),
        "late" => Some(AttendanceStatus::Late),
        "excused" => Some(AttendanceStatus::Excused),
        _ => None,
    }
}

fn attendance_error_response(e: &AttendanceError) -> axum::response::Response {
    match e {
        AttendanceError::EnrollmentNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "enrollment_not_found",
                "message": format!("Enrollment not found: {id}")
            })),
        )
            .into_response(),
        AttendanceError::Database(_) => (
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

/// GET `/enrollments/{enrollment_id}/attendance` - List attendance records.
async fn list_attendance(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AttendanceRepository::new((*state.db).clone());

    match repo.list_for_enrollment(enrollment_id).await {
        Ok(rows) => {
            let items: Vec<AttendanceResponse> =
                rows.into_iter().map(attendance_response).collect();
            (StatusCode::OK, Json(json!({ "attendance": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list attendance");
            attendance_error_response(&e)
        }
    }
}

/// POST `/enrollments/{enrollment_id}/attendance` - Record attendance for a session.
async fn record_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
    Json(payload): Json<RecordAttendanceRequest>,
) -> impl IntoResponse {
    let Some(status) = string_to_status(&payload.status) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_status",
                "message": "Status must be present, absent, late, or excused"
            })),
        )
            .into_response();
    };

    let repo = AttendanceRepository::new((*state.db).clone());
    let input = RecordAttendanceInput {
        enrollment_id,
        session_date: payload.session_date,
        status,
        remarks: payload.remarks,
        recorded_by: auth.user_id(),
    };

    match repo.record_attendance(input).await {
        Ok(record) => {
            info!(
                enrollment_id = %enrollment_id,
                session_date = %record.session_date,
                "Attendance recorded"
            );
            (StatusCode::CREATED, Json(attendance_response(record))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to record attendance");
            attendance_error_response(&e)
        }
    }
}
