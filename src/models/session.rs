use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::role::Role;

/// The identity claims a successful credential check produces.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: String,
    pub email: String,
    /// Stored as the raw label; the role authorization stage re-validates
    /// it against the known role set on every request.
    pub role: String,
    pub name: String,
}

/// Represents an authenticated principal for the lifetime of a login.
///
/// A session is immutable once created: the expiry is computed once at
/// creation and never extended (no sliding expiration). Handlers only ever
/// see a read-only clone attached to the request extensions.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session id (base64url, 256 bits of entropy).
    pub sid: String,
    /// The ID of the user this session belongs to.
    pub user_id: String,
    /// The user's email address.
    pub email: String,
    /// The role label carried by the login claims.
    pub role: String,
    /// The user's display name.
    pub name: String,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether this session's absolute expiry has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Remaining lifetime in whole seconds, clamped at zero.
    pub fn remaining_seconds(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

/// The identity published to resource handlers once the full pipeline has
/// passed. Only the role authorization stage inserts this into the request
/// extensions; handlers receive it read-only.
#[derive(Debug, Clone, Serialize)]
pub struct AuthIdentity {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub role: Role,
}
