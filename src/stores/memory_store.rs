//! Simple in-memory entry store for local development/testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::binary_entry;
use crate::path::EntryKey;
use crate::store::{EntryStore, NewEntry, StoreError};

/// In-memory entry store keyed by `(directory, name)`.
///
/// Counts every store operation so tests can assert that codec rejections
/// never reach the store.
#[derive(Default)]
pub struct MemoryEntryStore {
    map: RwLock<HashMap<(String, String), binary_entry::Model>>,
    next_id: AtomicI64,
    calls: AtomicU64,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn generate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn now_nanos() -> i64 {
        Utc::now().timestamp_nanos_opt().unwrap_or(0)
    }

    fn map_key(key: &EntryKey) -> (String, String) {
        (key.directory.clone(), key.name.clone())
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    fn name(&self) -> &'static str {
        "memory-entry-store"
    }

    async fn find_by_key(
        &self,
        key: &EntryKey,
    ) -> Result<Vec<binary_entry::Model>, StoreError> {
        self.tick();
        let guard = self.map.read().await;
        Ok(guard
            .get(&Self::map_key(key))
            .cloned()
            .into_iter()
            .collect())
    }

    async fn insert(&self, entry: NewEntry) -> Result<binary_entry::Model, StoreError> {
        self.tick();
        let mut guard = self.map.write().await;
        let map_key = Self::map_key(&entry.key);
        if guard.contains_key(&map_key) {
            return Err(StoreError::UniquenessViolation {
                directory: entry.key.directory,
                name: entry.key.name,
            });
        }

        let now = Self::now_nanos();
        let model = binary_entry::Model {
            id: self.generate_id(),
            hash: Uuid::now_v7(),
            directory: entry.key.directory,
            name: entry.key.name,
            size: entry.content.len() as i64,
            content: entry.content,
            mime_type: entry.mime_type,
            created_at: now,
            updated_at: now,
        };
        guard.insert(map_key, model.clone());
        Ok(model)
    }

    async fn update_key(&self, old: &EntryKey, new: &EntryKey) -> Result<(), StoreError> {
        self.tick();
        let mut guard = self.map.write().await;
        let new_map_key = Self::map_key(new);
        if guard.contains_key(&new_map_key) {
            return Err(StoreError::UniquenessViolation {
                directory: new.directory.clone(),
                name: new.name.clone(),
            });
        }
        let Some(mut model) = guard.remove(&Self::map_key(old)) else {
            return Err(StoreError::NotFound {
                directory: old.directory.clone(),
                name: old.name.clone(),
            });
        };
        model.directory = new.directory.clone();
        model.name = new.name.clone();
        model.updated_at = Self::now_nanos();
        guard.insert(new_map_key, model);
        Ok(())
    }

    async fn delete_by_key(&self, key: &EntryKey) -> Result<u64, StoreError> {
        self.tick();
        let mut guard = self.map.write().await;
        Ok(guard.remove(&Self::map_key(key)).map_or(0, |_| 1))
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, StoreError> {
        self.tick();
        let mut guard = self.map.write().await;
        let before = guard.len();
        guard.retain(|(directory, _), _| directory != prefix);
        Ok((before - guard.len()) as u64)
    }

    async fn list_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<binary_entry::Model>, StoreError> {
        self.tick();
        let guard = self.map.read().await;
        Ok(guard
            .values()
            .filter(|m| m.directory == prefix)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(directory: &str, name: &str, content: &[u8]) -> NewEntry {
        NewEntry {
            key: EntryKey::new(directory, name),
            content: content.to_vec(),
            mime_type: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_size() {
        let store = MemoryEntryStore::new();
        let created = store.insert(new_entry(".", "a.txt", b"hello")).await.unwrap();
        assert_eq!(created.size, 5);
        assert!(created.id > 0);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_uniqueness_violation() {
        let store = MemoryEntryStore::new();
        store.insert(new_entry(".", "a.txt", b"x")).await.unwrap();
        let err = store.insert(new_entry(".", "a.txt", b"y")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniquenessViolation { .. }));
    }

    #[tokio::test]
    async fn update_key_preserves_identity_and_advances_updated_at() {
        let store = MemoryEntryStore::new();
        let created = store.insert(new_entry("docs", "a.txt", b"x")).await.unwrap();
        store
            .update_key(&EntryKey::new("docs", "a.txt"), &EntryKey::new("docs", "b.txt"))
            .await
            .unwrap();
        let moved = store
            .find_by_key(&EntryKey::new("docs", "b.txt"))
            .await
            .unwrap()
            .remove(0);
        assert_eq!(moved.id, created.id);
        assert_eq!(moved.hash, created.hash);
        assert!(moved.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_by_prefix_only_touches_that_prefix() {
        let store = MemoryEntryStore::new();
        store.insert(new_entry("docs", "a.txt", b"x")).await.unwrap();
        store.insert(new_entry("docs", "b.txt", b"x")).await.unwrap();
        store.insert(new_entry("other", "c.txt", b"x")).await.unwrap();

        assert_eq!(store.delete_by_prefix("docs").await.unwrap(), 2);
        assert_eq!(store.list_by_prefix("other").await.unwrap().len(), 1);
    }
}
