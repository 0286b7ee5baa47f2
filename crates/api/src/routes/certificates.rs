//! Good moral certificate routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use academe_db::{
    entities::good_moral_certificates,
    repositories::certificate::{
        CertificateError, CertificateRepository, IssueCertificateInput,
    },
};

/// Creates the certificate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students/{student_id}/certificates", post(issue_certificate))
        .route("/certificates", get(list_certificates))
        .route("/certificates/{serial}", get(get_certificate))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing certificates.
#[derive(Debug, Deserialize)]
pub struct ListCertificatesQuery {
    /// Filter by student.
    pub student: Option<Uuid>,
}

/// Request body for issuing a certificate.
#[derive(Debug, Deserialize)]
pub struct IssueCertificateRequest {
    /// Stated purpose of the certificate.
    pub purpose: String,
}

/// Response for a certificate.
#[derive(Debug, Serialize)]
pub struct CertificateResponse {
    /// Certificate ID.
    pub id: Uuid,
    /// Student ID.
    pub student_id: Uuid,
    /// Control number.
    pub serial: String,
    /// Stated purpose.
    pub purpose: String,
    /// Issuing staff member.
    pub issued_by: Uuid,
    /// Issuance timestamp.
    pub issued_at: String,
}

fn certificate_response(model: good_moral_certificates::Model) -> CertificateResponse {
    CertificateResponse {
        id: model.id,
        student_id: model.student_id,
        serial: model.serial,
        purpose: model.purpose,
        issued_by: model.issued_by,
        issued_at: model.issued_at.to_rfc3339(),
    }
}

fn certificate_error_response(e: &CertificateError) -> axum::response::Response {
    match e {
        CertificateError::NotFound(serial) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Certificate not found: {serial}")
            })),
        )
            .into_response(),
        CertificateError::StudentNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "student_not_found",
                "message": format!("Student not found: {id}")
            })),
        )
            .into_response(),
        CertificateError::SerialConflict => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "serial_conflict",
                "message": "Concurrent certificate issuance, please retry"
            })),
        )
            .into_response(),
        CertificateError::CorruptSerial(_) | CertificateError::Database(_) => (
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

/// POST `/students/{student_id}/certificates` - Issue a good moral certificate.
async fn issue_certificate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
    Json(payload): Json<IssueCertificateRequest>,
) -> impl IntoResponse {
    if payload.purpose.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_purpose",
                "message": "Purpose is required"
            })),
        )
            .into_response();
    }

    let repo = CertificateRepository::new((*state.db).clone());
    let input = IssueCertificateInput {
        student_id,
        purpose: payload.purpose,
        issued_by: auth.user_id(),
    };

    match repo.issue_certificate(input).await {
        Ok(certificate) => {
            info!(
                student_id = %student_id,
                serial = %certificate.serial,
                "Certificate issued"
            );
            (StatusCode::CREATED, Json(certificate_response(certificate))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to issue certificate");
            certificate_error_response(&e)
        }
    }
}

/// GET `/certificates` - List certificates.
async fn list_certificates(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListCertificatesQuery>,
) -> impl IntoResponse {
    let repo = CertificateRepository::new((*state.db).clone());

    match repo.list_certificates(query.student).await {
        Ok(rows) => {
            let items: Vec<CertificateResponse> =
                rows.into_iter().map(certificate_response).collect();
            (StatusCode::OK, Json(json!({ "certificates": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list certificates");
            certificate_error_response(&e)
        }
    }
}

/// GET `/certificates/{serial}` - Look up a certificate by control number.
async fn get_certificate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(serial): Path<String>,
) -> impl IntoResponse {
    let repo = CertificateRepository::new((*state.db).clone());

    match repo.find_by_serial(&serial).await {
        Ok(certificate) => {
            (StatusCode::OK, Json(certificate_response(certificate))).into_response()
        }
        Err(e) => certificate_error_response(&e),
    }
}
