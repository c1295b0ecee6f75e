//! Adapter factory.
//!
//! The single surface the hosting application touches: given a
//! configuration, yields an adapter wired to its store.

use std::sync::Arc;

use crate::adapter::DatabaseAdapter;
use crate::config::Config;
use crate::error::FsError;
use crate::stores::DatabaseEntryStore;

/// Factory for creating adapter instances.
pub struct AdapterFactory;

impl AdapterFactory {
    /// Create an adapter from config.
    pub async fn create_from_config(config: Config) -> Result<Arc<DatabaseAdapter>, FsError> {
        let strategy = config.namespace;
        let store = DatabaseEntryStore::from_config(&config).await?;
        Ok(Arc::new(DatabaseAdapter::new(Arc::new(store), strategy)))
    }

    /// Create an adapter from a connection URL (simplified interface).
    pub async fn create_from_url(url: &str) -> Result<Arc<DatabaseAdapter>, FsError> {
        let config = Config::from_url(url).map_err(|e| FsError::Config(e.to_string()))?;
        Self::create_from_config(config).await
    }
}

/// Convenience function to create an adapter from a connection URL.
pub async fn create_adapter_from_url(url: &str) -> Result<Arc<DatabaseAdapter>, FsError> {
    AdapterFactory::create_from_url(url).await
}
