//! Lecturer catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use academe_db::{
    entities::lecturers,
    repositories::lecturer::{
        CreateLecturerInput, LecturerError, LecturerRepository, UpdateLecturerInput,
    },
};

/// Creates the lecturer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lecturers", get(list_lecturers))
        .route("/lecturers", post(create_lecturer))
        .route("/lecturers/{lecturer_id}", get(get_lecturer))
        .route("/lecturers/{lecturer_id}", patch(update_lecturer))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing lecturers.
#[derive(Debug, Deserialize)]
pub struct ListLecturersQuery {
    /// Only list active lecturers.
    #[serde(default)]
    pub active: bool,
}

/// Request body for creating a lecturer.
#[derive(Debug, Deserialize)]
pub struct CreateLecturerRequest {
    /// Full name.
    pub full_name: String,
    /// Subject specialization.
    pub specialization: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Request body for updating a lecturer.
#[derive(Debug, Deserialize)]
pub struct UpdateLecturerRequest {
    /// Full name.
    pub full_name: Option<String>,
    /// Subject specialization.
    pub specialization: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Whether the lecturer is active.
    pub is_active: Option<bool>,
}

/// Response for a lecturer.
#[derive(Debug, Serialize)]
pub struct LecturerResponse {
    /// Lecturer ID.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Subject specialization.
    pub specialization: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Whether the lecturer is active.
    pub is_active: bool,
}

fn lecturer_response(model: lecturers::Model) -> LecturerResponse {
    LecturerResponse {
        id: model.id,
        full_name: model.full_name,
        specialization: model.specialization,
        email: model.email,
        phone: model.phone,
        is_active: model.is_active,
    }
}

fn lecturer_error_response(e: &LecturerError) -> axum::response::Response {
    match e {
        LecturerError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Lecturer not found"
            })),
        )
            .into_response(),
        LecturerError::Database(_) => (
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

/// GET `/lecturers` - List lecturers.
async fn list_lecturers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListLecturersQuery>,
) -> impl IntoResponse {
    let repo = LecturerRepository::new((*state.db).clone());

    match repo.list_lecturers(query.active).await {
        Ok(rows) => {
            let items: Vec<LecturerResponse> = rows.into_iter().map(lecturer_response).collect();
            (StatusCode::OK, Json(json!({ "lecturers": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list lecturers");
            lecturer_error_response(&e)
        }
    }
}

/// POST `/lecturers` - Create a lecturer.
async fn create_lecturer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateLecturerRequest>,
) -> impl IntoResponse {
    if payload.full_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_name",
                "message": "Full name is required"
            })),
        )
            .into_response();
    }

    let repo = LecturerRepository::new((*state.db).clone());
    let input = CreateLecturerInput {
        full_name: payload.full_name,
        specialization: payload.specialization,
        email: payload.email,
        phone: payload.phone,
    };

    match repo.create_lecturer(input).await {
        Ok(lecturer) => {
            info!(lecturer_id = %lecturer.id, "Lecturer created");
            (StatusCode::CREATED, Json(lecturer_response(lecturer))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create lecturer");
            lecturer_error_response(&e)
        }
    }
}

/// GET `/lecturers/{lecturer_id}` - Get a lecturer.
async fn get_lecturer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(lecturer_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LecturerRepository::new((*state.db).clone());

    match repo.get_lecturer(lecturer_id).await {
        Ok(lecturer) => (StatusCode::OK, Json(lecturer_response(lecturer))).into_response(),
        Err(e) => lecturer_error_response(&e),
    }
}

/// PATCH `/lecturers/{lecturer_id}` - Update a lecturer.
async fn update_lecturer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(lecturer_id): Path<Uuid>,
    Json(payload): Json<UpdateLecturerRequest>,
) -> impl IntoResponse {
    let repo = LecturerRepository::new((*state.db).clone());
    let input = UpdateLecturerInput {
        full_name: payload.full_name,
        specialization: payload.specialization.map(Some),
        email: payload.email.map(Some),
        phone: payload.phone.map(Some),
        is_active: payload.is_active,
    };

    match repo.update_lecturer(lecturer_id, input).await {
        Ok(lecturer) => {
            info!(lecturer_id = %lecturer_id, "Lecturer updated");
            (StatusCode::OK, Json(lecturer_response(lecturer))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update lecturer");
            lecturer_error_response(&e)
        }
    }
}
