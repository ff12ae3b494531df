//! Content store error types.

/// Kinds of content store errors.
///
/// These cover unexpected I/O only. A file that simply does not exist is
/// reported by the store as an absent value, not as one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to read a file the store expected to be readable
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Metadata document could not be parsed
    #[display("Invalid metadata: {}", _0)]
    InvalidMetadata(String),
}

/// Content store error with location tracking.
///
/// # Examples
///
/// ```
/// use wisdom_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileRead("/wisdoms/00001.yaml".to_string()));
/// assert!(format!("{}", err).contains("Failed to read"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
