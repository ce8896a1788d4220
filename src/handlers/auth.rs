use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;

use crate::{
    audit,
    error::{AppError, Result},
    middleware_layer::session::SESSION_COOKIE,
    models::session::Session,
    state::AppState,
    validation::auth::{validate_email, validate_password},
};

/// The request payload for login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub message: String,
}

/// Placeholder RSA public key handed to frontends for payload envelopes.
/// Not used by the admission pipeline itself.
const PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----\n\
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAwbCkKkLw4w5S0lFJtJbJ\n\
8tN0kV7FQe0Kz4oVt0mZr8kM1J5u1G2Y8QkE6k7sQwXQ0B4i8mVv9Dc5Yz0k6I2V\n\
U3vC0p2C1wJ9mWJ+Z1YV0hN4QWw3q3dpC2wJtqI9XrCtO8xWQq5LqUwJ3L0lmv7t\n\
1yHfQJm4bYIs1jvZxk7yF7cYQsmQqfGQe8tF6KkzE4e5nLQZqV8k4z1c8E9pGxkN\n\
k9q3r4G2wVxC0UQyJf3b3J0qS8pZr5vK0k8j1yG4v2XbB2Qq6lZl8HfG0p1qjLw3\n\
bR+qP9yEJtLw0s3zIuC1tVfM7wIDAQAB\n\
-----END PUBLIC KEY-----\n";

/// Builds the `sid` cookie for a freshly created session.
///
/// `Max-Age` is the remaining session lifetime, so the cookie and the
/// server-side session expire together.
fn build_sid_cookie(session: &Session) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session.sid.clone());
    cookie.set_http_only(true);
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(session.remaining_seconds()));
    cookie
}

/// Handles login: credential check, session creation, `sid` cookie.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for {}", audit::mask_email(&payload.email));
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let claims = state
        .accounts
        .authenticate(&payload.email, &payload.password)?
        .ok_or_else(|| AppError::Authentication("invalid credentials".to_string()))?;

    let session = state.sessions.create(claims).await;

    cookies.add(build_sid_cookie(&session));
    tracing::info!("✅ Session cookie issued for user {}", session.user_id);

    let response = AuthResponse {
        ok: true,
        message: "login accepted, session created".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles logout: invalidates the session (if any) and clears the cookie.
///
/// Public and idempotent: logging out without a live session still
/// succeeds and still clears the browser cookie.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    if let Some(sid_cookie) = cookies.get(SESSION_COOKIE) {
        let sid = sid_cookie.value().to_string();
        state.sessions.invalidate(&sid).await;
        tracing::info!("👋 Logout: session invalidated");
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_http_only(true);
    removal.set_same_site(tower_cookies::cookie::SameSite::Lax);
    removal.set_path("/");
    removal.set_max_age(Duration::seconds(0));
    cookies.add(removal);

    let response = AuthResponse {
        ok: true,
        message: "logged out".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// The response payload for the public-key endpoint.
#[derive(Serialize)]
pub struct PublicKeyResponse {
    #[serde(rename = "publicKeyPem")]
    pub public_key_pem: &'static str,
}

/// Returns the gateway's public key for payload encryption envelopes.
#[axum::debug_handler]
pub async fn public_key() -> Response {
    let body = Json(PublicKeyResponse {
        public_key_pem: PUBLIC_KEY_PEM,
    });
    (StatusCode::OK, body).into_response()
}

/// Registration is not open; the route exists so the public exemption set
/// stays accurate.
#[axum::debug_handler]
pub async fn register() -> Response {
    let response = AuthResponse {
        ok: false,
        message: "registration not available".to_string(),
    };
    (StatusCode::NOT_IMPLEMENTED, Json(response)).into_response()
}
