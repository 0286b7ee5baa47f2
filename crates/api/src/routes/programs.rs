//! Review program catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
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
use academe_db::{
    entities::programs,
    repositories::program::{
        CreateProgramInput, ProgramError, ProgramRepository, UpdateProgramInput,
    },
};

/// Creates the program routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs))
        .route("/programs", post(create_program))
        .route("/programs/{program_id}", get(get_program))
        .route("/programs/{program_id}", patch(update_program))
        .route("/programs/{program_id}", delete(delete_program))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing programs.
#[derive(Debug, Deserialize)]
pub struct ListProgramsQuery {
    /// Only list programs accepting enrollments.
    #[serde(default)]
    pub active: bool,
}

/// Request body for creating a program.
#[derive(Debug, Deserialize)]
pub struct CreateProgramRequest {
    /// Program name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Nominal enrollment fee (decimal string).
    pub fee: String,
    /// Schedule label.
    pub schedule: Option<String>,
    /// Assigned lecturer.
    pub lecturer_id: Option<Uuid>,
}

/// Request body for updating a program.
#[derive(Debug, Deserialize)]
pub struct UpdateProgramRequest {
    /// Program name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Nominal enrollment fee (decimal string).
    pub fee: Option<String>,
    /// Schedule label.
    pub schedule: Option<String>,
    /// Assigned lecturer.
    pub lecturer_id: Option<Uuid>,
    /// Whether the program accepts new enrollments.
    pub is_active: Option<bool>,
}

/// Response for a program.
#[derive(Debug, Serialize)]
pub struct ProgramResponse {
    /// Program ID.
    pub id: Uuid,
    /// Program name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Nominal enrollment fee.
    pub fee: String,
    /// Schedule label.
    pub schedule: Option<String>,
    /// Assigned lecturer.
    pub lecturer_id: Option<Uuid>,
    /// Whether the program accepts new enrollments.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

fn program_response(model: programs::Model) -> ProgramResponse {
    ProgramResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        fee: model.fee.to_string(),
        schedule: model.schedule,
        lecturer_id: model.lecturer_id,
        is_active: model.is_active,
        created_at: model.created_at.to_rfc3339(),
    }
}

fn program_error_response(e: &ProgramError) -> axum::response::Response {
    match e {
        ProgramError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Program not found"
            })),
        )
            .into_response(),
        ProgramError::LecturerNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "lecturer_not_found",
                "message": format!("Lecturer not found: {id}")
            })),
        )
            .into_response(),
        ProgramError::NegativeFee(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_fee",
                "message": "Program fee must not be negative"
            })),
        )
            .into_response(),
        ProgramError::HasEnrollments(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "has_enrollments",
                "message": "Programs with enrollments cannot be deleted; deactivate instead"
            })),
        )
            .into_response(),
        ProgramError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}

fn parse_fee(raw: &str) -> Result<Decimal, axum::response::Response> {
    match Decimal::from_str(raw) {
        Ok(fee) if fee >= Decimal::ZERO => Ok(fee),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_fee",
                "message": "Fee must be a non-negative decimal"
            })),
        )
            .into_response()),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/programs` - List programs.
async fn list_programs(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListProgramsQuery>,
) -> impl IntoResponse {
    let repo = ProgramRepository::new((*state.db).clone());

    match repo.list_programs(query.active).await {
        Ok(rows) => {
            let items: Vec<ProgramResponse> = rows.into_iter().map(program_response).collect();
            (StatusCode::OK, Json(json!({ "programs": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list programs");
            program_error_response(&e)
        }
    }
}

/// POST `/programs` - Create a program.
async fn create_program(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateProgramRequest>,
) -> impl IntoResponse {
    let fee = match parse_fee(&payload.fee) {
        Ok(fee) => fee,
        Err(response) => return response,
    };

    let repo = ProgramRepository::new((*state.db).clone());
    let input = CreateProgramInput {
        name: payload.name,
        description: payload.description,
        fee,
        schedule: payload.schedule,
        lecturer_id: payload.lecturer_id,
    };

    match repo.create_program(input).await {
        Ok(program) => {
            info!(program_id = %program.id, "Program created");
            (StatusCode::CREATED, Json(program_response(program))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create program");
            program_error_response(&e)
        }
    }
}

/// GET `/programs/{program_id}` - Get a program.
async fn get_program(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(program_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProgramRepository::new((*state.db).clone());

    match repo.get_program(program_id).await {
        Ok(program) => (StatusCode::OK, Json(program_response(program))).into_response(),
        Err(e) => program_error_response(&e),
    }
}

/// PATCH `/programs/{program_id}` - Update a program.
async fn update_program(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<UpdateProgramRequest>,
) -> impl IntoResponse {
    let fee = match payload.fee.as_deref() {
        None => None,
        Some(raw) => match parse_fee(raw) {
            Ok(fee) => Some(fee),
            Err(response) => return response,
        },
    };

    let repo = ProgramRepository::new((*state.db).clone());
    let input = UpdateProgramInput {
        name: payload.name,
        description: payload.description.map(Some),
        fee,
        schedule: payload.schedule.map(Some),
        lecturer_id: payload.lecturer_id.map(Some),
        is_active: payload.is_active,
    };

    match repo.update_program(program_id, input).await {
        Ok(program) => {
            info!(program_id = %program_id, "Program updated");
            (StatusCode::OK, Json(program_response(program))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update program");
            program_error_response(&e)
        }
    }
}

/// DELETE `/programs/{program_id}` - Delete a program without enrollments.
async fn delete_program(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(program_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProgramRepository::new((*state.db).clone());

    match repo.delete_program(program_id).await {
        Ok(()) => {
            info!(program_id = %program_id, "Program deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete program");
            program_error_response(&e)
        }
    }
}
