use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use moka::{future::Cache, policy::EvictionPolicy};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::models::session::{Session, SessionClaims};

/// The size of a session id in bytes before encoding (256 bits).
const SESSION_ID_SIZE: usize = 32;

/// The authoritative mapping from session id to session.
///
/// Bounded and time-expiring; sessions do not survive a process restart.
/// Expiry is absolute (`created + ttl`) and never extended.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates a new `SessionStore`.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of live sessions.
    /// * `ttl` - Absolute session lifetime.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache, ttl }
    }

    /// Creates and stores a session for the given claims.
    ///
    /// The id is 32 bytes from the OS RNG, base64url-encoded; collision
    /// with a live id is ruled out by entropy, not checked.
    pub async fn create(&self, claims: SessionClaims) -> Session {
        let sid = random_sid();
        let created_at = Utc::now();
        let expires_at = created_at
            + chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero());

        let session = Session {
            sid: sid.clone(),
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            name: claims.name,
            created_at,
            expires_at,
        };

        self.cache.insert(sid.clone(), session.clone()).await;
        tracing::info!(
            "Session created for user {} ({})",
            session.user_id,
            crate::audit::mask_sid(&sid)
        );
        session
    }

    /// Returns the session only if present and not expired.
    ///
    /// A found-but-expired entry is lazily evicted and reported absent;
    /// expired sessions are never handed to callers even when the physical
    /// TTL eviction has not run yet.
    pub async fn get(&self, sid: &str) -> Option<Session> {
        let session = self.cache.get(sid).await?;
        if session.is_expired() {
            self.cache.invalidate(sid).await;
            return None;
        }
        Some(session)
    }

    /// Unconditionally removes a session. Idempotent.
    pub async fn invalidate(&self, sid: &str) {
        self.cache.invalidate(sid).await;
        tracing::info!("Session invalidated: {}", crate::audit::mask_sid(sid));
    }
}

fn random_sid() -> String {
    let mut bytes = [0u8; SESSION_ID_SIZE];
    OsRng.fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
