//! Error types for the wisdom bot.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! Expected absences in the content store (no candidates, missing metadata,
//! missing image) are not errors and never appear here. Only faults do.
//!
//! # Examples
//!
//! ```
//! use wisdom_error::{StorageError, StorageErrorKind, WisdomResult};
//!
//! fn read_entry() -> WisdomResult<String> {
//!     Err(StorageError::new(StorageErrorKind::FileRead("00001.yaml".to_string())))?
//! }
//!
//! assert!(read_entry().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod publish;
mod storage;

pub use config::ConfigError;
pub use error::{WisdomError, WisdomErrorKind, WisdomResult};
pub use publish::PublishError;
pub use storage::{StorageError, StorageErrorKind};
