//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::contacts::ContactStore;
use crate::router::Router;
use crate::services::{AuthService, WeatherClient, WeatherError};
use crate::storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to open contact store: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to create weather client: {0}")]
    Weather(#[from] WeatherError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the key-value store, the router, and
/// the service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    storage: Arc<dyn KeyValueStore>,
    router: Router,
    auth: AuthService,
    weather: Option<WeatherClient>,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Opens the file-backed store when `store_path` is set, otherwise keeps
    /// contacts in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be opened or the weather
    /// client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, StateError> {
        let storage: Arc<dyn KeyValueStore> = match &config.store_path {
            Some(path) => {
                let storage = FileStorage::open(path)?;
                tracing::info!(path = %path.display(), "Contact store opened");
                Arc::new(storage)
            }
            None => {
                tracing::warn!("POCKETBOOK_STORE_PATH not set, contacts are kept in memory");
                Arc::new(MemoryStorage::new())
            }
        };

        Self::with_storage(config, storage)
    }

    /// Create the application state over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the weather client cannot be built.
    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, StateError> {
        let auth = AuthService::new(config.users.clone());
        let weather = config.weather.clone().map(WeatherClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                router: Router::default(),
                auth,
                weather,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the key-value store.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.inner.storage.as_ref()
    }

    /// Contact operations over the key-value store.
    #[must_use]
    pub fn contacts(&self) -> ContactStore<'_> {
        ContactStore::new(self.storage())
    }

    /// Get a reference to the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    /// Get a reference to the login service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// The weather client, when a weather API key is configured.
    #[must_use]
    pub fn weather(&self) -> Option<&WeatherClient> {
        self.inner.weather.as_ref()
    }
}
