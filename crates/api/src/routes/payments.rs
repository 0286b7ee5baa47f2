//! Payment management routes.
//!
//! Every mutation returns the enrollment snapshot reconciled in the same
//! transaction as the payment write, so clients always see the post-mutation
//! aggregate state.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use academe_core::billing::BalanceSnapshot;
use academe_db::{
    entities::{payments, sea_orm_active_enums::PaymentStatus},
    repositories::payment::{
        CreatePaymentInput, PaymentError, PaymentMutation, PaymentRepository, UpdatePaymentInput,
    },
};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments/{enrollment_id}/payments", get(list_payments))
        .route("/enrollments/{enrollment_id}/payments", post(create_payment))
        .route("/payments/{payment_id}", get(get_payment))
        .route("/payments/{payment_id}", patch(update_payment))
        .route("/payments/{payment_id}", delete(delete_payment))
        .route("/payments/{payment_id}/refund", post(refund_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount collected (decimal string, positive).
    pub amount: String,
    /// Initial status: "pending" or "completed" (default "completed").
    pub status: Option<String>,
    /// Optional promotional total override (decimal string, positive).
    pub promo_override: Option<String>,
    /// Payment method label.
    #[serde(default = "default_method")]
    pub method: String,
    /// Optional receipt or bank reference number.
    pub reference_number: Option<String>,
}

fn default_method() -> String {
    "cash".to_string()
}

/// Request body for correcting a payment.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    /// Corrected amount (decimal string, positive).
    pub amount: Option<String>,
    /// Corrected status ("pending" or "completed"; refunds go through the
    /// refund endpoint).
    pub status: Option<String>,
    /// Corrected promo override; empty string clears it.
    pub promo_override: Option<String>,
    /// Corrected method label.
    pub method: Option<String>,
    /// Corrected reference number.
    pub reference_number: Option<String>,
}

/// Response for a payment row.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Owning enrollment ID.
    pub enrollment_id: Uuid,
    /// Amount.
    pub amount: String,
    /// Status.
    pub status: String,
    /// Promo override, when present.
    pub promo_override: Option<String>,
    /// Method label.
    pub method: String,
    /// Reference number.
    pub reference_number: Option<String>,
    /// Cashier who recorded the payment.
    pub received_by: Uuid,
    /// Collection timestamp.
    pub paid_at: String,
}

/// Response for the enrollment aggregate snapshot.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    /// Effective total value.
    pub total_value: String,
    /// Sum of completed payments.
    pub total_paid: String,
    /// Amount still owed.
    pub remaining_balance: String,
    /// Settlement status.
    pub payment_status: String,
}

/// Response for a payment mutation: the row plus the reconciled snapshot.
#[derive(Debug, Serialize)]
pub struct PaymentMutationResponse {
    /// The payment row after the mutation.
    pub payment: PaymentResponse,
    /// The enrollment's reconciled aggregates.
    pub enrollment: SnapshotResponse,
}

fn payment_response(model: payments::Model) -> PaymentResponse {
    PaymentResponse {
        id: model.id,
        enrollment_id: model.enrollment_id,
        amount: model.amount.to_string(),
        status: status_to_string(&model.status),
        promo_override: model.promo_override.map(|d| d.to_string()),
        method: model.method,
        reference_number: model.reference_number,
        received_by: model.received_by,
        paid_at: model.paid_at.to_rfc3339(),
    }
}

fn snapshot_response(snapshot: &BalanceSnapshot) -> SnapshotResponse {
    SnapshotResponse {
        total_value: snapshot.total_value.to_string(),
        total_paid: snapshot.total_paid.to_string(),
        remaining_balance: snapshot.remaining_balance.to_string(),
        payment_status: snapshot.payment_status.to_string(),
    }
}

fn mutation_response(mutation: PaymentMutation) -> PaymentMutationResponse {
    PaymentMutationResponse {
        enrollment: snapshot_response(&mutation.snapshot),
        payment: payment_response(mutation.payment),
    }
}

fn status_to_string(status: &PaymentStatus) -> String {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Completed => "completed",
        PaymentStatus::Refunded => "refunded",
    }
    .to_string()
}

fn string_to_status(s: &str) -> Option<PaymentStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(PaymentStatus::Pending),
        "completed" => Some(PaymentStatus::Completed),
        "refunded" => Some(PaymentStatus::Refunded),
        _ => None,
    }
}

fn parse_positive_amount(raw: &str, field: &str) -> Result<Decimal, axum::response::Response> {
    match Decimal::from_str(raw) {
        Ok(a) if a > Decimal::ZERO => Ok(a),
        Ok(_) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": format!("{field} must be positive")
            })),
        )
            .into_response()),
        Err(_) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": format!("Invalid {field} format")
            })),
        )
            .into_response()),
    }
}

fn payment_error_response(e: &PaymentError) -> axum::response::Response {
    match e {
        PaymentError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Payment not found"
            })),
        )
            .into_response(),
        PaymentError::EnrollmentNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "enrollment_not_found",
                "message": format!("Enrollment not found: {id}")
            })),
        )
            .into_response(),
        PaymentError::Billing(billing) => (
            StatusCode::from_u16(billing.http_status_code())
                .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY),
            Json(json!({
                "error": billing.error_code().to_lowercase(),
                "message": billing.to_string()
            })),
        )
            .into_response(),
        PaymentError::EnrollmentMissing(_) | PaymentError::Database(_) => (
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

/// GET `/enrollments/{enrollment_id}/payments` - List an enrollment's payments.
async fn list_payments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.list_for_enrollment(enrollment_id).await {
        Ok(rows) => {
            let items: Vec<PaymentResponse> = rows.into_iter().map(payment_response).collect();
            (StatusCode::OK, Json(json!({ "payments": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list payments");
            payment_error_response(&e)
        }
    }
}

/// GET `/payments/{payment_id}` - Get a payment row.
async fn get_payment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.get_payment(payment_id).await {
        Ok(payment) => (StatusCode::OK, Json(payment_response(payment))).into_response(),
        Err(e) => payment_error_response(&e),
    }
}

/// POST `/enrollments/{enrollment_id}/payments` - Record a payment.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(enrollment_id): Path<Uuid>,
    Json(payload): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    let amount = match parse_positive_amount(&payload.amount, "amount") {
        Ok(a) => a,
        Err(response) => return response,
    };

    let status = match payload.status.as_deref() {
        None => PaymentStatus::Completed,
        Some(raw) => match string_to_status(raw) {
            Some(PaymentStatus::Refunded) | None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Initial status must be 'pending' or 'completed'"
                    })),
                )
                    .into_response();
            }
            Some(status) => status,
        },
    };

    let promo_override = match payload.promo_override.as_deref() {
        None => None,
        Some(raw) => match parse_positive_amount(raw, "promo_override") {
            Ok(value) => Some(value),
            Err(response) => return response,
        },
    };

    let repo = PaymentRepository::new((*state.db).clone());
    let input = CreatePaymentInput {
        enrollment_id,
        amount,
        status,
        promo_override,
        method: payload.method,
        reference_number: payload.reference_number,
        received_by: auth.user_id(),
    };

    match repo.create_payment(input).await {
        Ok(mutation) => {
            info!(
                enrollment_id = %enrollment_id,
                payment_id = %mutation.payment.id,
                "Payment recorded"
            );
            (StatusCode::CREATED, Json(mutation_response(mutation))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to record payment");
            payment_error_response(&e)
        }
    }
}

/// PATCH `/payments/{payment_id}` - Correct a payment row.
async fn update_payment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> impl IntoResponse {
    let amount = match payload.amount.as_deref() {
        None => None,
        Some(raw) => match parse_positive_amount(raw, "amount") {
            Ok(a) => Some(a),
            Err(response) => return response,
        },
    };

    let status = match payload.status.as_deref() {
        None => None,
        Some(raw) => match string_to_status(raw) {
            // Refunds have their own endpoint with their own semantics.
            Some(PaymentStatus::Refunded) | None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Status must be 'pending' or 'completed'; use the refund endpoint to refund"
                    })),
                )
                    .into_response();
            }
            Some(status) => Some(status),
        },
    };

    // Empty string clears the override; a value must parse positive.
    let promo_override = match payload.promo_override.as_deref() {
        None => None,
        Some("") => Some(None),
        Some(raw) => match parse_positive_amount(raw, "promo_override") {
            Ok(value) => Some(Some(value)),
            Err(response) => return response,
        },
    };

    let repo = PaymentRepository::new((*state.db).clone());
    let input = UpdatePaymentInput {
        amount,
        status,
        promo_override,
        method: payload.method,
        reference_number: payload.reference_number.map(Some),
    };

    match repo.update_payment(payment_id, input).await {
        Ok(mutation) => {
            info!(payment_id = %payment_id, "Payment corrected");
            (StatusCode::OK, Json(mutation_response(mutation))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update payment");
            payment_error_response(&e)
        }
    }
}

/// DELETE `/payments/{payment_id}` - Administrative reversal of a payment.
async fn delete_payment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.delete_payment(payment_id).await {
        Ok(mutation) => {
            info!(payment_id = %payment_id, "Payment deleted");
            (
                StatusCode::OK,
                Json(json!({ "enrollment": snapshot_response(&mutation.snapshot) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete payment");
            payment_error_response(&e)
        }
    }
}

/// POST `/payments/{payment_id}/refund` - Refund a completed payment.
async fn refund_payment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.refund_payment(payment_id).await {
        Ok(mutation) => {
            info!(payment_id = %payment_id, "Payment refunded");
            (StatusCode::OK, Json(mutation_response(mutation))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to refund payment");
            payment_error_response(&e)
        }
    }
}
