//! Path codec: validation and decomposition of logical paths.
//!
//! Pure and deterministic; never touches the store. A codec rejection
//! short-circuits a verb before any store access happens.

use serde::{Deserialize, Serialize};

use crate::error::FsError;

/// Directory value stored for root-level entries.
pub const ROOT_DIRECTORY: &str = ".";

/// Canonical lookup key derived from a logical path.
///
/// The `(directory, name)` pair identifies a file and is unique across all
/// live entries; the store enforces the constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub directory: String,
    pub name: String,
}

impl EntryKey {
    pub fn new(directory: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
        }
    }
}

/// Path namespace selected at adapter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStrategy {
    /// Root-level single-segment file names only; any separator is rejected.
    Flat,
    /// Parent-directory / base-name decomposition; a path without a
    /// separator lives in the root directory `"."`.
    #[default]
    Prefixed,
}

impl PathStrategy {
    /// Validate a file path and derive its storage key.
    ///
    /// A valid path names a file with an extension: its last segment
    /// contains a `.`.
    pub fn resolve(&self, path: &str) -> Result<EntryKey, FsError> {
        match self {
            PathStrategy::Flat => {
                if path.contains('/') {
                    return Err(FsError::DirectoriesUnsupported(path.to_string()));
                }
                if !path.contains('.') {
                    return Err(FsError::MissingExtension(path.to_string()));
                }
                Ok(EntryKey::new(ROOT_DIRECTORY, path))
            }
            PathStrategy::Prefixed => {
                // empty segments would alias "docs//a.txt" away from "docs/a.txt"
                let mut segments: Vec<&str> =
                    path.split('/').filter(|s| !s.is_empty()).collect();
                let name = segments.pop().unwrap_or_default();
                if !name.contains('.') {
                    return Err(FsError::MissingExtension(path.to_string()));
                }
                let directory = if segments.is_empty() {
                    ROOT_DIRECTORY.to_string()
                } else {
                    segments.join("/")
                };
                Ok(EntryKey::new(directory, name))
            }
        }
    }

    /// Normalize a directory path into the stored prefix form.
    ///
    /// Only meaningful for the prefixed namespace; `""` and `"/"` mean the
    /// root directory.
    pub fn resolve_prefix(&self, path: &str) -> String {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            ROOT_DIRECTORY.to_string()
        } else {
            segments.join("/")
        }
    }
}
