use std::sync::Arc;
use std::time::Duration;

use crate::cache::nonce::NonceCache;
use crate::cache::session::SessionStore;
use crate::config::Config;
use crate::error::Result;
use crate::route_table::RouteTable;
use crate::services::accounts::AccountDirectory;

/// The application's state.
///
/// Cheap to clone; the stores are shared across clones, so every in-flight
/// request observes the same nonce and session state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The authoritative session store.
    pub sessions: SessionStore,
    /// The replay-protection nonce cache.
    pub nonces: NonceCache,
    /// The static route authorization table.
    pub routes: Arc<RouteTable>,
    /// The seeded account directory backing the login credential check.
    pub accounts: Arc<AccountDirectory>,
}

impl AppState {
    /// Creates a new `AppState` from the configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let sessions = SessionStore::new(
            config.session_cache_capacity,
            Duration::from_secs(config.session_ttl_seconds),
        );
        tracing::info!(
            "✅ Session store initialized (ttl {}s, capacity {})",
            config.session_ttl_seconds,
            config.session_cache_capacity
        );

        let nonces = NonceCache::new(
            config.nonce_cache_capacity,
            Duration::from_millis(config.nonce_ttl_ms),
        );
        tracing::info!(
            "✅ Nonce cache initialized (ttl {}ms, capacity {})",
            config.nonce_ttl_ms,
            config.nonce_cache_capacity
        );

        let routes = Arc::new(RouteTable::school_records());
        tracing::info!("✅ Route authorization table built");

        let accounts = Arc::new(AccountDirectory::seeded()?);
        tracing::info!("✅ Account directory seeded");

        Ok(AppState {
            config: config.clone(),
            sessions,
            nonces,
            routes,
            accounts,
        })
    }
}
