use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    audit,
    error::AppError,
    models::role::Role,
    models::session::{AuthIdentity, Session},
    state::AppState,
};

/// The role authorization stage: last gate before the resource handlers.
///
/// Consults the static route table and fails closed: a route with no
/// table entry denies every role. On success this stage (and only this
/// stage) publishes the `AuthIdentity` consumed by handlers.
pub async fn authorize_role(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if state.routes.is_role_exempt(&method, &path) {
        tracing::debug!("✅ Role exemption: {} {}", method, path);
        return Ok(next.run(request).await);
    }

    let request_id = audit::correlation_id(request.headers());

    // The session stage runs first; a missing session here is an ordering
    // bug upstream and must still fail closed.
    let session = request
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or_else(|| {
            tracing::warn!("❌ [{}] No session in context on {} {}", request_id, method, path);
            AppError::Authentication("unauthorized: missing session".to_string())
        })?;

    if session.is_expired() {
        tracing::warn!("❌ [{}] Session expired for user {}", request_id, session.user_id);
        return Err(AppError::Authentication("unauthorized: session expired".to_string()));
    }

    let role: Role = session.role.parse().map_err(|_| {
        tracing::warn!(
            "❌ [{}] Invalid role {:?} for user {}",
            request_id,
            session.role,
            session.user_id
        );
        AppError::Forbidden("forbidden: invalid role".to_string())
    })?;

    let permitted = state
        .routes
        .roles_for(&method, &path)
        .is_some_and(|roles| roles.contains(&role));

    if !permitted {
        tracing::warn!(
            "❌ [{}] Role {} not permitted on {} {} (user {})",
            request_id,
            role,
            method,
            path,
            session.user_id
        );
        return Err(AppError::Forbidden("forbidden: insufficient privileges".to_string()));
    }

    tracing::debug!(
        "✅ [{}] {} authorized as {} on {} {}",
        request_id,
        session.user_id,
        role,
        method,
        path
    );

    request.extensions_mut().insert(AuthIdentity {
        user_id: session.user_id.clone(),
        role,
    });

    Ok(next.run(request).await)
}
