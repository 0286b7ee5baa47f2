//! Student record routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use academe_db::{
    entities::students,
    repositories::student::{
        CreateStudentInput, StudentError, StudentRepository, UpdateStudentInput,
    },
};
use academe_shared::types::pagination::{PageRequest, PageResponse};

/// Creates the student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students", post(create_student))
        .route("/students/{student_id}", get(get_student))
        .route("/students/{student_id}", patch(update_student))
        .route("/students/{student_id}", delete(delete_student))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing students.
#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    /// Name search term.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a student.
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Home address.
    pub address: Option<String>,
    /// School of origin.
    pub school_of_origin: Option<String>,
}

/// Request body for updating a student.
#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Home address.
    pub address: Option<String>,
    /// School of origin.
    pub school_of_origin: Option<String>,
}

/// Response for a student record.
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    /// Student ID.
    pub id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Home address.
    pub address: Option<String>,
    /// School of origin.
    pub school_of_origin: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

fn student_response(model: students::Model) -> StudentResponse {
    StudentResponse {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        middle_name: model.middle_name,
        email: model.email,
        phone: model.phone,
        address: model.address,
        school_of_origin: model.school_of_origin,
        created_at: model.created_at.to_rfc3339(),
    }
}

fn student_error_response(e: &StudentError) -> axum::response::Response {
    match e {
        StudentError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Student not found"
            })),
        )
            .into_response(),
        StudentError::HasEnrollments(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "has_enrollments",
                "message": "Students with enrollments on record cannot be deleted"
            })),
        )
            .into_response(),
        StudentError::Database(_) => (
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

/// GET `/students` - List students with optional name search.
async fn list_students(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListStudentsQuery>,
) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20).min(100),
    };

    match repo.list_students(query.search.as_deref(), &page).await {
        Ok((rows, total)) => {
            let items: Vec<StudentResponse> = rows.into_iter().map(student_response).collect();
            let response = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list students");
            student_error_response(&e)
        }
    }
}

/// POST `/students` - Create a student record.
async fn create_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_name",
                "message": "First and last name are required"
            })),
        )
            .into_response();
    }

    let repo = StudentRepository::new((*state.db).clone());
    let input = CreateStudentInput {
        first_name: payload.first_name,
        last_name: payload.last_name,
        middle_name: payload.middle_name,
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        school_of_origin: payload.school_of_origin,
    };

    match repo.create_student(input).await {
        Ok(student) => {
            info!(student_id = %student.id, "Student created");
            (StatusCode::CREATED, Json(student_response(student))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create student");
            student_error_response(&e)
        }
    }
}

/// GET `/students/{student_id}` - Get a student record.
async fn get_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());

    match repo.get_student(student_id).await {
        Ok(student) => (StatusCode::OK, Json(student_response(student))).into_response(),
        Err(e) => student_error_response(&e),
    }
}

/// PATCH `/students/{student_id}` - Update a student record.
async fn update_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(student_id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());
    let input = UpdateStudentInput {
        first_name: payload.first_name,
        last_name: payload.last_name,
        middle_name: payload.middle_name.map(Some),
        email: payload.email.map(Some),
        phone: payload.phone.map(Some),
        address: payload.address.map(Some),
        school_of_origin: payload.school_of_origin.map(Some),
    };

    match repo.update_student(student_id, input).await {
        Ok(student) => {
            info!(student_id = %student_id, "Student updated");
            (StatusCode::OK, Json(student_response(student))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update student");
            student_error_response(&e)
        }
    }
}

/// DELETE `/students/{student_id}` - Delete a student without enrollments.
async fn delete_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());

    match repo.delete_student(student_id).await {
        Ok(()) => {
            info!(student_id = %student_id, "Student deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete student");
            student_error_response(&e)
        }
    }
}
