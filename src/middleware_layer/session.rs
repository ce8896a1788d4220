use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{audit, error::AppError, state::AppState};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sid";

/// The session resolution stage: maps the `sid` cookie to a live session.
///
/// "Never existed" and "expired" collapse into one externally
/// indistinguishable rejection so callers cannot enumerate session ids.
/// On success the session is attached to the request extensions, read-only
/// for the rest of the pipeline and the handler.
pub async fn resolve_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if state.routes.is_session_exempt(&method, &path) {
        tracing::debug!("✅ Session exemption: {} {}", method, path);
        return Ok(next.run(request).await);
    }

    let request_id = audit::correlation_id(request.headers());

    let sid = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            tracing::warn!("❌ [{}] No sid cookie on {} {}", request_id, method, path);
            AppError::Authentication("unauthorized: missing sid".to_string())
        })?;

    let session = state.sessions.get(&sid).await.ok_or_else(|| {
        tracing::warn!("❌ [{}] Unknown or expired sid", request_id);
        AppError::Authentication("unauthorized: invalid or expired sid".to_string())
    })?;

    // The store already lazily evicts expired hits; re-check here in case
    // the entry aged out between lookup and use.
    if session.is_expired() {
        tracing::warn!("❌ [{}] Session expired for user {}", request_id, session.user_id);
        return Err(AppError::Authentication("unauthorized: session expired".to_string()));
    }

    tracing::debug!(
        "✅ [{}] Session resolved for {} ({})",
        request_id,
        session.user_id,
        audit::mask_email(&session.email)
    );

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
