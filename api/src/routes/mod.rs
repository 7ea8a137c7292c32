//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/register`, `/login` → account creation and token issuance (public)
//! - `/teacher` → profile, classes, subjects and attendance recording (teacher token)
//! - `/student` → profile, classes, attendance, enrollment and QR check-in (student token)

use crate::auth::guards::{allow_student, allow_teacher};
use crate::routes::{
    auth::auth_routes, health::health_routes, student::student_routes, teacher::teacher_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod auth;
pub mod common;
pub mod health;
pub mod student;
pub mod teacher;

/// Builds the router for everything mounted under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .merge(auth_routes())
        .nest("/teacher", teacher_routes().route_layer(from_fn(allow_teacher)))
        .nest("/student", student_routes().route_layer(from_fn(allow_student)))
        .with_state(app_state)
}
