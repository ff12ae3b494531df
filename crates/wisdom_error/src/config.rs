//! Configuration error types.

/// Configuration error with source location.
///
/// Raised while loading or validating configuration at startup. A run never
/// produces one.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Configuration key the error refers to, if any
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use wisdom_error::ConfigError;
    ///
    /// let err = ConfigError::new("Missing required field");
    /// assert!(err.message.contains("Missing required"));
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a ConfigError tied to a specific configuration key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wisdom_error::ConfigError;
    ///
    /// let err = ConfigError::for_key("text.greetings.de", "pool is empty");
    /// assert_eq!(err.key.as_deref(), Some("text.greetings.de"));
    /// assert!(err.to_string().contains("text.greetings.de"));
    /// ```
    #[track_caller]
    pub fn for_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        let key = key.into();
        Self {
            message: format!("{}: {}", key, message.into()),
            key: Some(key),
            line: location.line(),
            file: location.file(),
        }
    }
}
