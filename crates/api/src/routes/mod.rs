//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod attendance;
pub mod auth;
pub mod certificates;
pub mod enrollments;
pub mod health;
pub mod lecturers;
pub mod payments;
pub mod programs;
pub mod reports;
pub mod students;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(students::routes())
        .merge(lecturers::routes())
        .merge(programs::routes())
        .merge(enrollments::routes())
        .merge(payments::routes())
        .merge(attendance::routes())
        .merge(certificates::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
