//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::Config;
use crate::db::catalog::Catalog;
use crate::db::users::UserStore;
use crate::services::auth;
use crate::services::fetcher::{FetchError, Fetcher};
use crate::services::tokens::TokenService;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("failed to hash the admin password")]
    AdminPasswordHash,
    #[error("failed to build the fetch client: {0}")]
    Fetcher(#[from] FetchError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the user store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    users: UserStore,
    catalog: Catalog,
    fetcher: Fetcher,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Hashes the configured admin password and seeds the user store
    /// with the admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin password cannot be hashed or the
    /// fetch client cannot be built.
    pub fn new(config: Config) -> Result<Self, StateInitError> {
        let admin_hash = auth::hash_password(config.admin_password.expose_secret())
            .map_err(|_| StateInitError::AdminPasswordHash)?;
        let users = UserStore::seeded(config.admin_email.clone(), admin_hash);
        let catalog = Catalog::demo();
        let fetcher = Fetcher::new(&config.fetch_allowed_hosts)?;
        let tokens = TokenService::new(&config.token_secret);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                catalog,
                fetcher,
                tokens,
            }),
        })
    }

    /// Get a reference to the store configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    /// Get a reference to the product/order catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the outbound fetch client.
    #[must_use]
    pub fn fetcher(&self) -> &Fetcher {
        &self.inner.fetcher
    }

    /// Get a reference to the API token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
