//! Publishing error types.

use std::fmt;

/// Failure reported by the posting service or the transport in front of it.
///
/// Every rejection (unsupported media, oversized file, text too long, bad
/// credentials) has this one shape. `status` is the HTTP status the service
/// answered with and is `None` when no response was received at all.
///
/// # Examples
///
/// ```
/// use wisdom_error::PublishError;
///
/// let err = PublishError::new(Some(422), "text too long", None);
/// assert_eq!(err.status, Some(422));
/// assert!(err.to_string().contains("422"));
/// ```
#[derive(Debug, Clone, derive_more::Error)]
pub struct PublishError {
    /// HTTP status returned by the service
    pub status: Option<u16>,
    /// Error message
    pub message: String,
    /// Underlying cause, if one was reported
    pub cause: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl PublishError {
    /// Create a new PublishError at the current location.
    #[track_caller]
    pub fn new(status: Option<u16>, message: impl Into<String>, cause: Option<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            status,
            message: message.into(),
            cause,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The service answered with a non-success status.
    #[track_caller]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(Some(status), message, None)
    }

    /// The request never produced a usable response.
    #[track_caller]
    pub fn transport(message: impl Into<String>, cause: impl ToString) -> Self {
        Self::new(None, message, Some(cause.to_string()))
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Publish Error: {}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {})", status)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "; cause: {}", cause)?;
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
