//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::CustomerStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// customer store and the configured sheet name.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    customers: CustomerStore,
}

impl AppState {
    /// Create application state with the store built from `config`.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let customers = CustomerStore::from_config(&config);
        Self::with_store(config, customers)
    }

    /// Create application state around an existing store.
    #[must_use]
    pub fn with_store(config: AppConfig, customers: CustomerStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, customers }),
        }
    }

    /// Get a reference to the customer store.
    #[must_use]
    pub fn customers(&self) -> &CustomerStore {
        &self.inner.customers
    }

    /// Name of the sheet holding customer rows.
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.inner.config.sheet_name
    }
}
