//! Sparse attribute results returned by stat and list verbs.

/// Immutable attribute record for one path; unset fields are explicitly
/// `None` rather than defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    pub path: String,
    /// Byte size of the entry's content.
    pub size: Option<i64>,
    pub visibility: Option<String>,
    /// Last mutation time, nanoseconds since the epoch.
    pub last_modified: Option<i64>,
    pub mime_type: Option<String>,
}

impl FileAttributes {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size: None,
            visibility: None,
            last_modified: None,
            mime_type: None,
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_last_modified(mut self, nanos: i64) -> Self {
        self.last_modified = Some(nanos);
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}
