// Application state module
// Owns the configuration and both catalog caches for the life of the process

use std::sync::Arc;
use tokio::sync::Notify;

use crate::catalog::{CatalogCache, FilterRule};
use crate::config::Config;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    pub panoramas: CatalogCache,
    pub models: CatalogCache,

    /// Notified once when the server should stop accepting connections
    pub shutdown_signal: Arc<Notify>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let sort = config.assets.sort_entries;
        Self {
            config: config.clone(),
            panoramas: CatalogCache::new(config.assets.panorama_root(), FilterRule::Panorama, sort),
            models: CatalogCache::new(config.assets.model_root(), FilterRule::Model, sort),
            shutdown_signal: Arc::new(Notify::new()),
        }
    }

    pub const fn catalog(&self, rule: FilterRule) -> &CatalogCache {
        match rule {
            FilterRule::Panorama => &self.panoramas,
            FilterRule::Model => &self.models,
        }
    }
}
