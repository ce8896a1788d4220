use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

pub mod audit;
pub mod config;
pub mod error;
pub mod route_table;
pub mod state;

pub mod crypto {
    pub mod signature;
}

pub mod models {
    pub mod role;
    pub mod session;
}

pub mod cache {
    pub mod nonce;
    pub mod session;
}

pub mod services {
    pub mod accounts;
}

pub mod handlers {
    pub mod auth;
    pub mod records;
}

pub mod middleware_layer {
    pub mod hmac;
    pub mod role;
    pub mod session;
}

pub mod validation {
    pub mod auth;
}

use state::AppState;

/// Builds the gateway router with the full admission pipeline.
///
/// Runtime order for every request: trace → cookies → HMAC authentication
/// → session resolution → role authorization → handler. Each stage applies
/// its own exemption set, so public routes flow through untouched.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/API/public-key", get(handlers::auth::public_key))
        .route("/API/login", post(handlers::auth::login))
        .route("/API/logout", post(handlers::auth::logout))
        .route("/API/register", post(handlers::auth::register))
        .route("/API/profile", get(handlers::records::get_profile))
        .route("/API/profile", put(handlers::records::update_profile))
        .route("/API/students", get(handlers::records::list_students))
        .route("/API/guardians", get(handlers::records::list_guardians))
        .route("/API/grades", get(handlers::records::list_grades))
        .route("/API/grades", post(handlers::records::record_grade))
        .route("/API/disciplinary", get(handlers::records::list_disciplinary))
        .route("/API/disciplinary", post(handlers::records::record_disciplinary))
        .route("/API/reports", get(handlers::records::list_reports))
        // Plain `layer` (not `route_layer`) so unmatched paths still hit
        // the pipeline and fail closed instead of short-circuiting to 404.
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::role::authorize_role,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::session::resolve_session,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::hmac::authenticate_request,
        ))
        .layer(CookieManagerLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .with_state(state)
}
