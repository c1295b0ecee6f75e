//! Adapter error types.

use crate::store::StoreError;

/// Errors surfaced by the filesystem verbs.
///
/// Every failure maps to exactly one variant and is returned synchronously;
/// the adapter performs no internal retries.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("path requires a file extension: {0}")]
    MissingExtension(String),

    #[error("directories are not supported in the path: {0}")]
    DirectoriesUnsupported(String),

    #[error("cannot find the file {0}")]
    NotFound(String),

    #[error("there is already a file at that path: {0}")]
    AlreadyExists(String),

    #[error("unable to move {source_path} to {destination}")]
    MoveFailed {
        source_path: String,
        destination: String,
    },

    #[error("unable to copy {source_path} to {destination}")]
    CopyFailed {
        source_path: String,
        destination: String,
    },

    #[error("empty file or unreadable content stream")]
    EmptyContent,

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),
}

impl FsError {
    /// True for the path-codec rejections that short-circuit before any
    /// store access.
    pub fn is_invalid_path(&self) -> bool {
        matches!(
            self,
            FsError::MissingExtension(_) | FsError::DirectoriesUnsupported(_)
        )
    }
}
