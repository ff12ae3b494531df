//! Read-only content store for wisdoms.
//!
//! A wisdom is an image plus a small YAML document describing it, both named
//! after a five digit, zero-padded id:
//!
//! ```text
//! <store-root>/00001.yaml   (or .yml)       metadata, required
//! <store-root>/00001.jpg    (or .jpeg/.png) image, first match wins, required
//! ```
//!
//! Absence is an ordinary outcome here. Looking up an id that has no metadata
//! or no image returns `Ok(None)`; only unexpected I/O surfaces as an error.
//!
//! # Example
//!
//! ```no_run
//! use wisdom_store::{FileSystemStore, WisdomStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemStore::new("/srv/wisdoms");
//! for id in store.enumerate_candidates().await {
//!     if let Some(image) = store.load_image(id).await? {
//!         println!("{} -> {}", id, image.path().display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use derive_getters::Getters;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use wisdom_error::WisdomResult;

mod filesystem;

pub use filesystem::FileSystemStore;
pub use wisdom_error::{StorageError, StorageErrorKind};

/// Width of the zero-padded decimal form of an id.
pub const ID_WIDTH: usize = 5;

/// Metadata file extensions, in lookup order.
pub const METADATA_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Image file extensions, in preference order.
pub const IMAGE_EXTENSIONS: [(&str, ImageFormat); 3] = [
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
];

/// Identifier of a wisdom, always written as five zero-padded digits.
///
/// # Examples
///
/// ```
/// use wisdom_store::WisdomId;
///
/// let id: WisdomId = "00042".parse().unwrap();
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "00042");
/// assert!("42".parse::<WisdomId>().is_err());
/// assert!("00000".parse::<WisdomId>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display,
)]
#[display("{:05}", _0)]
pub struct WisdomId(u32);

impl WisdomId {
    /// Create an id from its numeric value. Zero is not a valid id.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Numeric value of the id.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Parse the id out of a metadata file name such as `00007.yml`.
    ///
    /// Returns `None` for anything that is not a metadata file of the store.
    pub fn from_metadata_file_name(name: &str) -> Option<Self> {
        let (stem, extension) = name.split_once('.')?;
        if !METADATA_EXTENSIONS.contains(&extension) {
            return None;
        }
        stem.parse().ok()
    }

    /// File name of this id with the given extension.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self, extension)
    }
}

impl FromStr for WisdomId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_WIDTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Not a {} digit wisdom id: {}", ID_WIDTH, s));
        }
        let value = s
            .parse::<u32>()
            .map_err(|e| format!("Invalid wisdom id {}: {}", s, e))?;
        Self::new(value).ok_or_else(|| format!("Wisdom ids start at 1: {}", s))
    }
}

/// The two fields every metadata document must carry.
///
/// Unrecognized keys in the document are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize)]
pub struct WisdomMetadata {
    /// Body text of the post.
    wisdom: String,
    /// Alt text of the image.
    description: String,
}

impl WisdomMetadata {
    /// Create metadata from its parts.
    pub fn new(wisdom: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            wisdom: wisdom.into(),
            description: description.into(),
        }
    }
}

/// Encoding of an image file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ImageFormat {
    /// `.jpg` or `.jpeg`
    #[display("jpeg")]
    Jpeg,
    /// `.png`
    #[display("png")]
    Png,
}

impl ImageFormat {
    /// MIME type sent along with the upload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// Handle to the image resolved for a wisdom.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct WisdomImage {
    /// Wisdom the image belongs to.
    id: WisdomId,
    /// Location of the image file.
    path: PathBuf,
    /// Encoding of the image.
    format: ImageFormat,
}

impl WisdomImage {
    /// Create an image handle.
    pub fn new(id: WisdomId, path: impl Into<PathBuf>, format: ImageFormat) -> Self {
        Self {
            id,
            path: path.into(),
            format,
        }
    }

    /// File name of the image, used as the upload's file name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.id.file_name(&self.format.to_string()))
    }
}

/// Read access to a store of wisdoms.
///
/// Implementations must treat the store as read-only and must not cache
/// anything between calls: every enumeration reflects the store as it is now.
#[async_trait::async_trait]
pub trait WisdomStore: Send + Sync {
    /// Ids of every wisdom that has a metadata document.
    ///
    /// An unreadable store yields an empty set rather than an error.
    async fn enumerate_candidates(&self) -> BTreeSet<WisdomId>;

    /// Load the metadata document of a wisdom.
    ///
    /// Returns `Ok(None)` when no document exists or the document is empty.
    async fn load_metadata(&self, id: WisdomId) -> WisdomResult<Option<WisdomMetadata>>;

    /// Resolve the image of a wisdom, preferring `.jpg`, then `.jpeg`, then `.png`.
    ///
    /// Returns `Ok(None)` when no image exists for the id.
    async fn load_image(&self, id: WisdomId) -> WisdomResult<Option<WisdomImage>>;

    /// Read the bytes of a previously resolved image.
    async fn read_image(&self, image: &WisdomImage) -> WisdomResult<Vec<u8>>;

    /// Root location of the store, for logging.
    fn root(&self) -> &Path;
}
