//! Top-level error wrapper types.

use crate::{ConfigError, PublishError, StorageError};

/// Every fault the wisdom bot can raise.
///
/// # Examples
///
/// ```
/// use wisdom_error::{ConfigError, WisdomError};
///
/// let err: WisdomError = ConfigError::new("store.directory is missing").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum WisdomErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Content store error
    #[from(StorageError)]
    Storage(StorageError),
    /// Posting service error
    #[from(PublishError)]
    Publish(PublishError),
}

/// Wisdom bot error with kind discrimination.
///
/// # Examples
///
/// ```
/// use wisdom_error::{WisdomErrorKind, WisdomResult, PublishError};
///
/// fn post() -> WisdomResult<()> {
///     Err(PublishError::rejected(401, "invalid token"))?
/// }
///
/// let err = post().unwrap_err();
/// assert!(matches!(err.kind(), WisdomErrorKind::Publish(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Wisdom Error: {}", _0)]
pub struct WisdomError(Box<WisdomErrorKind>);

impl WisdomError {
    /// Create a new error from a kind.
    pub fn new(kind: WisdomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WisdomErrorKind {
        &self.0
    }
}

impl<T> From<T> for WisdomError
where
    T: Into<WisdomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for wisdom bot operations.
pub type WisdomResult<T> = std::result::Result<T, WisdomError>;
