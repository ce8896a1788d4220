use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{
    audit,
    crypto::signature::{self, SUPPORTED_ALGORITHM},
    error::AppError,
    state::AppState,
};

/// Header carrying the algorithm identifier.
pub const HEADER_ALGORITHM: &str = "x-gateway-signature-alg";
/// Header carrying the base64 signature.
pub const HEADER_SIGNATURE: &str = "x-gateway-signature";
/// Header carrying the epoch-milliseconds timestamp.
pub const HEADER_TIMESTAMP: &str = "x-gateway-timestamp";
/// Header carrying the client-chosen nonce.
pub const HEADER_NONCE: &str = "x-gateway-nonce";

/// The HMAC authentication stage: first stage of the admission pipeline.
///
/// Verifies that the calling client holds the shared secret. Checks run in
/// fixed order (headers, algorithm, timestamp window, nonce dedup,
/// signature) and any failure is terminal. No user identity is
/// established here.
///
/// The nonce is consumed as soon as the headers are read, before the
/// timestamp and signature checks: a request rejected for a stale
/// timestamp or a bad signature still burns its nonce, so clients must
/// mint a fresh nonce and timestamp per attempt.
pub async fn authenticate_request(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if state.routes.is_hmac_exempt(&method, &path) {
        tracing::debug!("✅ HMAC exemption: {} {}", method, path);
        return Ok(next.run(request).await);
    }

    let request_id = audit::correlation_id(request.headers());

    let headers = request.headers();
    let (Some(alg), Some(sig), Some(timestamp), Some(nonce)) = (
        header_value(headers, HEADER_ALGORITHM),
        header_value(headers, HEADER_SIGNATURE),
        header_value(headers, HEADER_TIMESTAMP),
        header_value(headers, HEADER_NONCE),
    ) else {
        tracing::warn!("❌ [{}] Signing header missing on {} {}", request_id, method, path);
        return Err(AppError::Authentication("header parameter missing".to_string()));
    };

    if alg != SUPPORTED_ALGORITHM {
        tracing::warn!("❌ [{}] Unsupported signature algorithm: {}", request_id, alg);
        return Err(AppError::Forbidden("unsupported algorithm".to_string()));
    }

    // Atomic check-and-set, done before the timestamp checks: the nonce
    // stays consumed even when the request is rejected below, so a retry
    // with the same nonce fails as a replay.
    let nonce_fresh = state.nonces.insert_if_absent(&nonce).await;

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| {
            tracing::warn!("❌ [{}] Unparsable timestamp", request_id);
            AppError::Authentication("invalid timestamp".to_string())
        })?;

    // Symmetric window: both stale and future-dated timestamps are rejected
    // with the same status.
    let now = Utc::now().timestamp_millis();
    if (now - ts).abs() > state.config.timestamp_window_ms {
        tracing::warn!("❌ [{}] Timestamp out of range (skew {}ms)", request_id, now - ts);
        return Err(AppError::Authentication("timestamp out of range".to_string()));
    }

    if !nonce_fresh {
        tracing::warn!("❌ [{}] Replayed nonce on {} {}", request_id, method, path);
        return Err(AppError::Authentication("replayed nonce".to_string()));
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    // The body bytes are part of the canonical string; buffer them and
    // rebuild the request for the rest of the chain.
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read request body: {}", e)))?;
    let body_text = String::from_utf8_lossy(&body_bytes);

    let canonical = signature::canonical_string(
        method.as_str(),
        &path_and_query,
        &body_text,
        &timestamp,
        &nonce,
    );

    if let Err(e) = signature::verify_signature(&canonical, &state.config.shared_secret, &sig) {
        tracing::warn!("❌ [{}] Signature verification failed on {} {}", request_id, method, path);
        return Err(e);
    }

    tracing::debug!("✅ [{}] HMAC verified for {} {}", request_id, method, path);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
