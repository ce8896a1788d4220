//! Thin resource endpoints.
//!
//! The real CRUD layer (relational schema, query execution) lives outside
//! this gateway. These handlers exist to exercise the collaborator
//! interface: they read the identity the pipeline published and never see
//! a request the pipeline rejected.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    models::session::{AuthIdentity, Session},
};

/// Profile payload assembled from the resolved session.
#[derive(Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub role: String,
    pub name: String,
    pub email: String,
}

/// Generic payload for the stub resource endpoints.
#[derive(Serialize)]
pub struct ResourceResponse {
    pub ok: bool,
    pub resource: &'static str,
    pub identity: AuthIdentity,
}

/// GET /API/profile
#[axum::debug_handler]
pub async fn get_profile(
    Extension(session): Extension<Session>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Response> {
    let body = ProfileResponse {
        user_id: identity.user_id,
        role: session.role.clone(),
        name: session.name.clone(),
        email: session.email.clone(),
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// PUT /API/profile
#[axum::debug_handler]
pub async fn update_profile(Extension(identity): Extension<AuthIdentity>) -> Result<Response> {
    Ok(resource_ok("profile", identity))
}

/// GET /API/students
#[axum::debug_handler]
pub async fn list_students(Extension(identity): Extension<AuthIdentity>) -> Result<Response> {
    Ok(resource_ok("students", identity))
}

/// GET /API/guardians
#[axum::debug_handler]
pub async fn list_guardians(Extension(identity): Extension<AuthIdentity>) -> Result<Response> {
    Ok(resource_ok("guardians", identity))
}

/// GET /API/grades
#[axum::debug_handler]
pub async fn list_grades(Extension(identity): Extension<AuthIdentity>) -> Result<Response> {
    Ok(resource_ok("grades", identity))
}

/// POST /API/grades
#[axum::debug_handler]
pub async fn record_grade(Extension(identity): Extension<AuthIdentity>) -> Result<Response> {
    // The route table already restricts this to ARO; the predicate guards
    // against table edits drifting away from the write policy.
    if !identity.role.may_record_grades() {
        return Err(AppError::Forbidden("forbidden: insufficient privileges".to_string()));
    }
    Ok(resource_ok("grades", identity))
}

/// GET /API/disciplinary
#[axum::debug_handler]
pub async fn list_disciplinary(Extension(identity): Extension<AuthIdentity>) -> Result<Response> {
    Ok(resource_ok("disciplinary", identity))
}

/// POST /API/disciplinary
#[axum::debug_handler]
pub async fn record_disciplinary(
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Response> {
    if !identity.role.may_record_disciplinary() {
        return Err(AppError::Forbidden("forbidden: insufficient privileges".to_string()));
    }
    Ok(resource_ok("disciplinary", identity))
}

/// GET /API/reports
#[axum::debug_handler]
pub async fn list_reports(Extension(identity): Extension<AuthIdentity>) -> Result<Response> {
    Ok(resource_ok("reports", identity))
}

fn resource_ok(resource: &'static str, identity: AuthIdentity) -> Response {
    let body = ResourceResponse {
        ok: true,
        resource,
        identity,
    };
    (StatusCode::OK, Json(body)).into_response()
}
