use http::HeaderMap;
use uuid::Uuid;

/// Returns the caller-supplied `X-Request-ID`, or mints a fresh one so
/// every rejection can be correlated across log lines.
pub fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Masks the local part of an email address for audit log lines.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at) if at > 0 => format!("{}{}", "*".repeat(at), &email[at..]),
        _ => email.to_string(),
    }
}

/// Masks a session id for audit log lines, keeping only a short prefix.
/// The full value is a live bearer credential and must never be logged.
pub fn mask_sid(sid: &str) -> String {
    let prefix: String = sid.chars().take(8).collect();
    format!("{}...", prefix)
}
