use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The shared secret used to verify gateway request signatures.
    pub shared_secret: Zeroizing<Vec<u8>>,
    /// The lifetime of a session in seconds.
    pub session_ttl_seconds: u64,
    /// The maximum number of live sessions held by the session store.
    pub session_cache_capacity: u64,
    /// How long a nonce stays consumed, in milliseconds.
    pub nonce_ttl_ms: u64,
    /// The maximum number of nonces tracked by the dedup cache.
    pub nonce_cache_capacity: u64,
    /// The accepted clock skew for signed timestamps, in milliseconds.
    pub timestamp_window_ms: i64,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// Fails when `GATEWAY_SHARED_SECRET` is absent or blank; the gateway
    /// must not start without it.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let shared_secret = env::var("GATEWAY_SHARED_SECRET")
            .context("GATEWAY_SHARED_SECRET must be set")?;

        if shared_secret.trim().is_empty() {
            anyhow::bail!("GATEWAY_SHARED_SECRET must not be blank");
        }

        Ok(Self {
            shared_secret: Zeroizing::new(shared_secret.into_bytes()),
            session_ttl_seconds: env::var("SESSION_TTL_SECONDS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("Invalid SESSION_TTL_SECONDS")?,
            session_cache_capacity: env::var("SESSION_CACHE_CAPACITY")
                .unwrap_or_else(|_| "200000".to_string())
                .parse()
                .context("Invalid SESSION_CACHE_CAPACITY")?,
            nonce_ttl_ms: env::var("NONCE_TTL_MS")
                .unwrap_or_else(|_| "300000".to_string())
                .parse()
                .context("Invalid NONCE_TTL_MS")?,
            nonce_cache_capacity: env::var("NONCE_CACHE_CAPACITY")
                .unwrap_or_else(|_| "100000".to_string())
                .parse()
                .context("Invalid NONCE_CACHE_CAPACITY")?,
            timestamp_window_ms: env::var("TIMESTAMP_WINDOW_MS")
                .unwrap_or_else(|_| "300000".to_string())
                .parse()
                .context("Invalid TIMESTAMP_WINDOW_MS")?,
        })
    }
}
