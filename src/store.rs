//! Record store abstract interface.
//!
//! Defines the contract required from a backend that persists binary-entry
//! rows. The store owns the `(directory, name)` uniqueness constraint and
//! timestamp maintenance on mutation; the adapter relies on both. Concrete
//! backends (a SQL database store, an in-memory store for tests) are used
//! interchangeably by the adapter.

use async_trait::async_trait;

use crate::entities::binary_entry;
use crate::path::EntryKey;

/// Errors surfaced by a record store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The path-identifying columns already hold a live entry. Two
    /// concurrent writers can both pass the adapter's existence check; this
    /// variant is how the losing writer finds out.
    #[error("uniqueness violation for ({directory}, {name})")]
    UniquenessViolation { directory: String, name: String },

    #[error("no entry for ({directory}, {name})")]
    NotFound { directory: String, name: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Payload for creating a new entry.
///
/// Identity (`id`, `hash`), `size` and timestamps are assigned by the store
/// at insert time, so a persisted row is never partially populated.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub key: EntryKey,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Record store abstract interface.
///
/// Implementers should map backend-specific failures into `StoreError`
/// variants; in particular a duplicate-key error from the engine must
/// become `StoreError::UniquenessViolation`, never a generic failure.
#[async_trait]
#[auto_impl::auto_impl(&, std::sync::Arc)]
pub trait EntryStore: Send + Sync {
    /// Human readable backend name (for diagnostics and logging)
    fn name(&self) -> &'static str {
        "entry-store"
    }

    /// All live entries matching the key. More than one element signals a
    /// broken uniqueness constraint; callers decide how to report it.
    async fn find_by_key(&self, key: &EntryKey)
        -> Result<Vec<binary_entry::Model>, StoreError>;

    /// Persist a new entry, assigning identity and timestamps.
    async fn insert(&self, entry: NewEntry) -> Result<binary_entry::Model, StoreError>;

    /// Relabel the entry at `old` to `new`, advancing `updated_at`. Content
    /// and surrogate identity are untouched.
    async fn update_key(&self, old: &EntryKey, new: &EntryKey) -> Result<(), StoreError>;

    /// Remove the entry at `key`; returns the number of rows removed. Zero
    /// is not an error.
    async fn delete_by_key(&self, key: &EntryKey) -> Result<u64, StoreError>;

    /// Remove every entry whose directory prefix equals `prefix`; returns
    /// the number of rows removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, StoreError>;

    /// All entries whose directory prefix equals `prefix`, in store-native
    /// order.
    async fn list_by_prefix(&self, prefix: &str)
        -> Result<Vec<binary_entry::Model>, StoreError>;
}
