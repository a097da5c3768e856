//! Application state shared across all request handlers.

use crate::config::file::FileConfig;
use cofsvc_core::catalog::Catalog;
use cofsvc_core::orders::OrderStreamGenerator;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Catalog backend, read-only after seeding.
    pub catalog: Catalog,
    /// Opens one order stream per request.
    pub orders: Arc<OrderStreamGenerator>,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: Arc<RwLock<FileConfig>>,
}

impl AppState {
    /// Create a new AppState from a seeded catalog and the loaded configuration.
    pub fn new(catalog: Catalog, config: FileConfig) -> Self {
        let orders = OrderStreamGenerator::new(config.orders.interval());
        Self {
            catalog,
            orders: Arc::new(orders),
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Get a read lock on the configuration.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, FileConfig> {
        self.config.read().await
    }

    /// Update the configuration (used during SIGHUP reload).
    ///
    /// The new order interval applies to streams opened afterwards.
    pub async fn update_config(&self, new_config: FileConfig) {
        self.orders.set_interval(new_config.orders.interval());
        let mut config = self.config.write().await;
        *config = new_config;
    }
}
