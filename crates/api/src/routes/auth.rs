//! Authentication routes for login, register, refresh, and logout.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use academe_core::auth::{hash_password, verify_password};
use academe_db::repositories::user::{CreateUserInput, UserError, UserRepository};
use academe_db::repositories::session::SessionRepository;
use academe_db::entities::sea_orm_active_enums::UserRole;
use academe_shared::auth::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RegisterRequest, UserInfo,
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

fn role_label(role: &UserRole) -> &'static str {
    match role {
        UserRole::Admin => "admin",
        UserRole::Registrar => "registrar",
        UserRole::Cashier => "cashier",
    }
}

/// POST /auth/login - Authenticate a staff user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by email
    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    // Check if user is active
    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let role = role_label(&user.role);

    // Issue tokens
    let access_token = match state.jwt_service.generate_access_token(user.id, role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };
    let refresh_token = match state.jwt_service.generate_refresh_token(user.id, role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error();
        }
    };

    // Record the session
    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = chrono::Utc::now()
        + chrono::Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo
        .create_session(user.id, &refresh_token, expires_at, None, None)
        .await
    {
        error!(error = %e, "Failed to record session");
        return internal_error();
    }

    info!(user_id = %user.id, "User logged in");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: role.to_string(),
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/register - Create a staff account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    // Parse role
    let role = match payload.role.to_lowercase().as_str() {
        "admin" => UserRole::Admin,
        "registrar" => UserRole::Registrar,
        "cashier" => UserRole::Cashier,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_role",
                    "message": "Role must be admin, registrar, or cashier"
                })),
            )
                .into_response();
        }
    };

    if payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": "Password must be at least 8 characters"
            })),
        )
            .into_response();
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo
        .create_user(CreateUserInput {
            email: payload.email,
            password_hash,
            full_name: payload.full_name,
            role,
        })
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "Staff account created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": user.id,
                    "email": user.email,
                    "full_name": user.full_name,
                    "role": role_label(&user.role)
                })),
            )
                .into_response()
        }
        Err(UserError::DuplicateEmail(email)) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_email",
                "message": format!("Email already registered: {email}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            internal_error()
        }
    }
}

/// POST /auth/refresh - Rotate a refresh token into a new token pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // The token itself must be valid and unexpired
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Invalid or expired refresh token"
                })),
            )
                .into_response();
        }
    };

    // And must belong to a live session
    let session_repo = SessionRepository::new((*state.db).clone());
    if session_repo.find_active(&payload.refresh_token).await.is_err() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "session_revoked",
                "message": "Session has been revoked or expired"
            })),
        )
            .into_response();
    }

    let access_token = match state
        .jwt_service
        .generate_access_token(claims.user_id(), &claims.role)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };
    let refresh_token = match state
        .jwt_service
        .generate_refresh_token(claims.user_id(), &claims.role)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error();
        }
    };

    // Rotate: revoke the old session, record the new one
    if let Err(e) = session_repo.revoke(&payload.refresh_token).await {
        error!(error = %e, "Failed to revoke session during rotation");
        return internal_error();
    }
    let expires_at = chrono::Utc::now()
        + chrono::Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo
        .create_session(claims.user_id(), &refresh_token, expires_at, None, None)
        .await
    {
        error!(error = %e, "Failed to record rotated session");
        return internal_error();
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

/// POST /auth/logout - Revoke the presented refresh token.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    // Revoking an unknown token is not an error worth surfacing
    let _ = session_repo.revoke(&payload.refresh_token).await;

    (StatusCode::NO_CONTENT, ()).into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
