//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{AuthError, AuthService, DynNotifier, Notifier};
use crate::store::RecordStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// record store, the feedback notifier and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: RecordStore,
    notifier: DynNotifier,
}

impl AppState {
    /// Create a new application state with an empty store, then seed the
    /// operator account.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `notifier` - Feedback delivery (SMTP, disabled, or a test double)
    ///
    /// # Errors
    ///
    /// Returns an error if the operator password cannot be hashed.
    pub async fn new(config: ServerConfig, notifier: DynNotifier) -> Result<Self, AuthError> {
        let store = RecordStore::new();
        AuthService::new(&store).seed_admin(&config.admin).await?;
        tracing::info!(username = %config.admin.username, "Seeded operator account");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                notifier,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.inner.store
    }

    /// Get the feedback notifier.
    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }
}
