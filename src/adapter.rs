//! Adapter core: filesystem verbs over the record store.
//!
//! Every verb runs the path codec first; a codec rejection short-circuits
//! before any store access. The adapter is stateless between calls and
//! holds no locks; cross-call coordination is delegated to the store's
//! uniqueness constraint, and a uniqueness violation reported by the store
//! is mapped to the collision error of the verb that raced.

use std::io::Cursor;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error};

use crate::attributes::FileAttributes;
use crate::entities::binary_entry;
use crate::error::FsError;
use crate::mime;
use crate::path::{EntryKey, PathStrategy};
use crate::store::{EntryStore, NewEntry, StoreError};

/// Filesystem adapter whose backing store is a relational table.
pub struct DatabaseAdapter {
    store: Arc<dyn EntryStore>,
    strategy: PathStrategy,
}

impl DatabaseAdapter {
    /// The store handle is passed explicitly; the adapter keeps no other
    /// state and caches nothing.
    pub fn new(store: Arc<dyn EntryStore>, strategy: PathStrategy) -> Self {
        Self { store, strategy }
    }

    pub fn strategy(&self) -> PathStrategy {
        self.strategy
    }

    /// True iff exactly one live entry matches the derived key.
    pub async fn file_exists(&self, path: &str) -> Result<bool, FsError> {
        let key = self.strategy.resolve(path)?;
        Ok(self.store.find_by_key(&key).await?.len() == 1)
    }

    /// Directories exist only implicitly as the prefix of a file path.
    pub async fn directory_exists(&self, path: &str) -> Result<bool, FsError> {
        match self.strategy {
            PathStrategy::Flat => Ok(false),
            PathStrategy::Prefixed => {
                let prefix = self.strategy.resolve_prefix(path);
                Ok(!self.store.list_by_prefix(&prefix).await?.is_empty())
            }
        }
    }

    /// Create exactly one entry, or fail leaving the store unchanged.
    ///
    /// `mime_hint` wins over content sniffing when provided.
    pub async fn write(
        &self,
        path: &str,
        contents: &[u8],
        mime_hint: Option<&str>,
    ) -> Result<(), FsError> {
        let key = self.strategy.resolve(path)?;

        if contents.is_empty() {
            return Err(FsError::EmptyContent);
        }
        if !self.store.find_by_key(&key).await?.is_empty() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }

        let mime_type = mime_hint
            .map(str::to_string)
            .or_else(|| mime::sniff(&key.name, contents));
        let entry = NewEntry {
            key,
            content: contents.to_vec(),
            mime_type,
        };

        match self.store.insert(entry).await {
            Ok(created) => {
                debug!(path, hash = %created.hash, size = created.size, "created entry");
                Ok(())
            }
            // another writer won the race between the check and the insert
            Err(StoreError::UniquenessViolation { .. }) => {
                Err(FsError::AlreadyExists(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Same contract as `write`, taking a sequential byte source. The
    /// content is fully buffered; the buffer lives only for this call.
    pub async fn write_stream<R>(
        &self,
        path: &str,
        reader: &mut R,
        mime_hint: Option<&str>,
    ) -> Result<(), FsError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        // run the codec before draining the stream
        self.strategy.resolve(path)?;

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.map_err(|e| {
            debug!(path, error = %e, "unreadable content stream");
            FsError::EmptyContent
        })?;
        self.write(path, &buf, mime_hint).await
    }

    async fn find_single(
        &self,
        path: &str,
        key: &EntryKey,
    ) -> Result<binary_entry::Model, FsError> {
        let mut matches = self.store.find_by_key(key).await?;
        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(FsError::NotFound(path.to_string())),
            n => {
                // data corruption, not absence
                error!(
                    path,
                    matches = n,
                    "store uniqueness invariant violated: multiple entries resolve to one path"
                );
                Err(FsError::NotFound(path.to_string()))
            }
        }
    }

    pub async fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let key = self.strategy.resolve(path)?;
        let entry = self.find_single(path, &key).await?;
        Ok(entry.content)
    }

    /// Same contract as `read`, exposed as a sequential byte source. The
    /// full content is buffered; there are no partial reads.
    pub async fn read_stream(&self, path: &str) -> Result<Cursor<Vec<u8>>, FsError> {
        Ok(Cursor::new(self.read(path).await?))
    }

    /// Deleting a non-existent path is a no-op, not an error.
    pub async fn delete(&self, path: &str) -> Result<(), FsError> {
        let key = self.strategy.resolve(path)?;
        let removed = self.store.delete_by_key(&key).await?;
        debug!(path, removed, "delete");
        Ok(())
    }

    /// Delete every entry under the directory prefix. In the flat
    /// namespace this degrades to `delete`.
    pub async fn delete_directory(&self, path: &str) -> Result<(), FsError> {
        match self.strategy {
            PathStrategy::Flat => self.delete(path).await,
            PathStrategy::Prefixed => {
                let prefix = self.strategy.resolve_prefix(path);
                let removed = self.store.delete_by_prefix(&prefix).await?;
                debug!(path, removed, "delete directory");
                Ok(())
            }
        }
    }

    /// There is no directory-only entry; directories come into being as
    /// the prefix of a written file.
    pub async fn create_directory(&self, _path: &str) -> Result<(), FsError> {
        Err(FsError::Unsupported(
            "directories exist only as file path prefixes; write a file instead",
        ))
    }

    pub async fn set_visibility(&self, _path: &str, _visibility: &str) -> Result<(), FsError> {
        Err(FsError::Unsupported("visibility controls are not modeled"))
    }

    /// No access-control modeling exists; the prefixed namespace returns a
    /// neutral attribute record, the flat one refuses outright.
    pub async fn visibility(&self, path: &str) -> Result<FileAttributes, FsError> {
        match self.strategy {
            PathStrategy::Flat => {
                Err(FsError::Unsupported("visibility controls are not modeled"))
            }
            PathStrategy::Prefixed => {
                self.strategy.resolve(path)?;
                Ok(FileAttributes::new(path))
            }
        }
    }

    pub async fn mime_type(&self, path: &str) -> Result<FileAttributes, FsError> {
        let key = self.strategy.resolve(path)?;
        let entry = self.find_single(path, &key).await?;
        let mut attrs = FileAttributes::new(path);
        if let Some(m) = entry.mime_type {
            attrs = attrs.with_mime_type(m);
        }
        Ok(attrs)
    }

    pub async fn last_modified(&self, path: &str) -> Result<FileAttributes, FsError> {
        let key = self.strategy.resolve(path)?;
        let entry = self.find_single(path, &key).await?;
        Ok(FileAttributes::new(path).with_last_modified(entry.updated_at))
    }

    pub async fn file_size(&self, path: &str) -> Result<FileAttributes, FsError> {
        let key = self.strategy.resolve(path)?;
        let entry = self.find_single(path, &key).await?;
        Ok(FileAttributes::new(path).with_size(entry.size))
    }

    /// One attribute record per matching entry, in store-native order.
    /// `recursive` is accepted for interface parity; without nested
    /// directories the prefix match is single-level either way.
    pub async fn list(&self, path: &str, recursive: bool) -> Result<Vec<FileAttributes>, FsError> {
        let _ = recursive;
        let entries = match self.strategy {
            PathStrategy::Flat => {
                let key = self.strategy.resolve(path)?;
                self.store.find_by_key(&key).await?
            }
            PathStrategy::Prefixed => {
                let prefix = self.strategy.resolve_prefix(path);
                self.store.list_by_prefix(&prefix).await?
            }
        };

        if entries.is_empty() {
            return Err(FsError::NotFound(path.to_string()));
        }

        Ok(entries
            .into_iter()
            .map(|e| {
                let mut attrs = FileAttributes::new(e.path())
                    .with_size(e.size)
                    .with_last_modified(e.updated_at);
                if let Some(m) = e.mime_type {
                    attrs = attrs.with_mime_type(m);
                }
                attrs
            })
            .collect())
    }

    /// Atomically relabel the source entry to the destination path.
    /// Content and surrogate identity are preserved; `updated_at` advances.
    pub async fn rename(&self, source: &str, destination: &str) -> Result<(), FsError> {
        let src_key = self.strategy.resolve(source)?;
        let dst_key = self.strategy.resolve(destination)?;

        let move_failed = || FsError::MoveFailed {
            source_path: source.to_string(),
            destination: destination.to_string(),
        };

        if !self.store.find_by_key(&dst_key).await?.is_empty() {
            return Err(move_failed());
        }
        if self.store.find_by_key(&src_key).await?.is_empty() {
            return Err(move_failed());
        }

        match self.store.update_key(&src_key, &dst_key).await {
            Ok(()) => {
                debug!(source, destination, "moved entry");
                Ok(())
            }
            Err(StoreError::UniquenessViolation { .. }) | Err(StoreError::NotFound { .. }) => {
                Err(move_failed())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Duplicate the source entry under the destination path with fresh
    /// identity and timestamps, leaving the source untouched.
    pub async fn copy(&self, source: &str, destination: &str) -> Result<(), FsError> {
        let src_key = self.strategy.resolve(source)?;
        let dst_key = self.strategy.resolve(destination)?;

        let copy_failed = || FsError::CopyFailed {
            source_path: source.to_string(),
            destination: destination.to_string(),
        };

        if !self.store.find_by_key(&dst_key).await?.is_empty() {
            return Err(copy_failed());
        }
        let Some(entry) = self.store.find_by_key(&src_key).await?.into_iter().next() else {
            return Err(copy_failed());
        };

        let duplicate = NewEntry {
            key: dst_key,
            content: entry.content,
            mime_type: entry.mime_type,
        };
        match self.store.insert(duplicate).await {
            Ok(_) => {
                debug!(source, destination, "copied entry");
                Ok(())
            }
            Err(StoreError::UniquenessViolation { .. }) => Err(copy_failed()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryEntryStore;
    use async_trait::async_trait;
    use uuid::Uuid;

    fn flat_adapter() -> (Arc<MemoryEntryStore>, DatabaseAdapter) {
        let store = Arc::new(MemoryEntryStore::new());
        let adapter = DatabaseAdapter::new(store.clone(), PathStrategy::Flat);
        (store, adapter)
    }

    fn prefixed_adapter() -> DatabaseAdapter {
        DatabaseAdapter::new(Arc::new(MemoryEntryStore::new()), PathStrategy::Prefixed)
    }

    #[tokio::test]
    async fn invalid_paths_never_reach_the_store() {
        let (store, fs) = flat_adapter();

        assert!(fs.file_exists("readme").await.unwrap_err().is_invalid_path());
        assert!(fs.read("a/b.txt").await.unwrap_err().is_invalid_path());
        assert!(fs
            .write("readme", b"data", None)
            .await
            .unwrap_err()
            .is_invalid_path());
        assert!(fs.delete("a/b.txt").await.unwrap_err().is_invalid_path());
        assert!(fs
            .rename("readme", "other.txt")
            .await
            .unwrap_err()
            .is_invalid_path());

        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn write_stream_validates_before_draining() {
        let (store, fs) = flat_adapter();
        let mut reader = Cursor::new(b"data".to_vec());
        let err = fs
            .write_stream("a/b.txt", &mut reader, None)
            .await
            .unwrap_err();
        assert!(err.is_invalid_path());
        assert_eq!(store.call_count(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[tokio::test]
    async fn empty_content_is_rejected_before_any_write() {
        let (_, fs) = flat_adapter();
        let err = fs.write("notes.txt", b"", None).await.unwrap_err();
        assert!(matches!(err, FsError::EmptyContent));
        assert!(!fs.file_exists("notes.txt").await.unwrap());
    }

    #[tokio::test]
    async fn visibility_is_unsupported_or_neutral() {
        let (_, flat) = flat_adapter();
        assert!(matches!(
            flat.visibility("a.txt").await.unwrap_err(),
            FsError::Unsupported(_)
        ));
        assert!(matches!(
            flat.set_visibility("a.txt", "public").await.unwrap_err(),
            FsError::Unsupported(_)
        ));

        let prefixed = prefixed_adapter();
        let attrs = prefixed.visibility("docs/a.txt").await.unwrap();
        assert_eq!(attrs, FileAttributes::new("docs/a.txt"));
    }

    #[tokio::test]
    async fn create_directory_is_always_unsupported() {
        let (_, flat) = flat_adapter();
        assert!(matches!(
            flat.create_directory("docs").await.unwrap_err(),
            FsError::Unsupported(_)
        ));
        assert!(matches!(
            prefixed_adapter().create_directory("docs").await.unwrap_err(),
            FsError::Unsupported(_)
        ));
    }

    #[tokio::test]
    async fn mime_hint_wins_over_sniffing() {
        let (_, fs) = flat_adapter();
        fs.write("notes.txt", b"hello", Some("application/x-custom"))
            .await
            .unwrap();
        let attrs = fs.mime_type("notes.txt").await.unwrap();
        assert_eq!(attrs.mime_type.as_deref(), Some("application/x-custom"));
    }

    /// Store stub whose key holds two entries, simulating a broken
    /// uniqueness constraint.
    struct DuplicateStore;

    fn dup_model(n: i64) -> binary_entry::Model {
        binary_entry::Model {
            id: n,
            hash: Uuid::now_v7(),
            directory: ".".to_string(),
            name: "dup.txt".to_string(),
            content: b"x".to_vec(),
            size: 1,
            mime_type: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[async_trait]
    impl EntryStore for DuplicateStore {
        async fn find_by_key(
            &self,
            _key: &EntryKey,
        ) -> Result<Vec<binary_entry::Model>, StoreError> {
            Ok(vec![dup_model(1), dup_model(2)])
        }

        async fn insert(&self, _entry: NewEntry) -> Result<binary_entry::Model, StoreError> {
            Err(StoreError::Database(sea_orm::DbErr::Custom(
                "unsupported".to_string(),
            )))
        }

        async fn update_key(&self, _old: &EntryKey, _new: &EntryKey) -> Result<(), StoreError> {
            Err(StoreError::Database(sea_orm::DbErr::Custom(
                "unsupported".to_string(),
            )))
        }

        async fn delete_by_key(&self, _key: &EntryKey) -> Result<u64, StoreError> {
            Ok(0)
        }

        async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, StoreError> {
            Ok(0)
        }

        async fn list_by_prefix(
            &self,
            _prefix: &str,
        ) -> Result<Vec<binary_entry::Model>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn multiplicity_breach_reads_as_not_found() {
        let fs = DatabaseAdapter::new(Arc::new(DuplicateStore), PathStrategy::Flat);
        assert!(matches!(
            fs.read("dup.txt").await.unwrap_err(),
            FsError::NotFound(_)
        ));
        assert!(matches!(
            fs.file_size("dup.txt").await.unwrap_err(),
            FsError::NotFound(_)
        ));
        // exists reports false rather than erroring
        assert!(!fs.file_exists("dup.txt").await.unwrap());
    }
}
