// Library crate for dbfs: filesystem verbs over a relational table of
// binary entries.

pub mod adapter;
pub mod attributes;
pub mod config;
pub mod entities;
pub mod error;
pub mod factory;
pub mod mime;
pub mod path;
pub mod store;
pub mod stores;

// Public surface for external users.
pub use crate::adapter::DatabaseAdapter;
pub use crate::attributes::FileAttributes;
pub use crate::config::{Config, ConfigError, DatabaseConfig, DatabaseType};
pub use crate::entities::BinaryEntryModel;
pub use crate::error::FsError;
pub use crate::factory::{create_adapter_from_url, AdapterFactory};
pub use crate::path::{EntryKey, PathStrategy, ROOT_DIRECTORY};
pub use crate::store::{EntryStore, NewEntry, StoreError};
pub use crate::stores::{DatabaseEntryStore, MemoryEntryStore};
