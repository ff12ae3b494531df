//! Directory-backed wisdom store.

use crate::{
    IMAGE_EXTENSIONS, METADATA_EXTENSIONS, WisdomId, WisdomImage, WisdomMetadata, WisdomStore,
};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use wisdom_error::{StorageError, StorageErrorKind, WisdomResult};

/// Store reading wisdoms from a single flat directory.
///
/// # Example Structure
///
/// ```text
/// /srv/wisdoms/
/// ├── 00001.yaml
/// ├── 00001.jpg
/// ├── 00002.yml
/// ├── 00002.png
/// └── 00007.yaml   (ids need not be contiguous)
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Create a store rooted at `base_path`.
    ///
    /// The directory is not touched here; a missing directory shows up later
    /// as an empty candidate set.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        tracing::debug!(path = %base_path.display(), "Created filesystem wisdom store");
        Self { base_path }
    }

    fn path_for(&self, id: WisdomId, extension: &str) -> PathBuf {
        self.base_path.join(id.file_name(extension))
    }

    /// Read the first metadata file that exists for `id`, skipping directories.
    async fn read_metadata_document(&self, id: WisdomId) -> WisdomResult<Option<(PathBuf, String)>> {
        for extension in METADATA_EXTENSIONS {
            let path = self.path_for(id, extension);
            if !Self::is_file(&path).await? {
                continue;
            }
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => return Ok(Some((path, contents))),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                    .into());
                }
            }
        }
        Ok(None)
    }

    /// Whether a regular file exists at `path`.
    async fn is_file(path: &Path) -> WisdomResult<bool> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}

/// Parse a metadata document. Empty documents and empty mappings are absent.
fn parse_metadata(path: &Path, contents: &str) -> WisdomResult<Option<WisdomMetadata>> {
    let value: serde_yaml::Value = serde_yaml::from_str(contents).map_err(|e| {
        StorageError::new(StorageErrorKind::InvalidMetadata(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    let is_empty = match &value {
        serde_yaml::Value::Null => true,
        serde_yaml::Value::Mapping(mapping) => mapping.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(None);
    }

    let metadata = serde_yaml::from_value(value).map_err(|e| {
        StorageError::new(StorageErrorKind::InvalidMetadata(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(Some(metadata))
}

#[async_trait::async_trait]
impl WisdomStore for FileSystemStore {
    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn enumerate_candidates(&self) -> BTreeSet<WisdomId> {
        let mut entries = match tokio::fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Wisdom directory is not readable");
                return BTreeSet::new();
            }
        };

        let mut ids = BTreeSet::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed while scanning wisdom directory");
                    return BTreeSet::new();
                }
            };

            let is_dir = entry
                .file_type()
                .await
                .map(|file_type| file_type.is_dir())
                .unwrap_or(true);
            if is_dir {
                continue;
            }

            let name = entry.file_name();
            if let Some(id) = name.to_str().and_then(WisdomId::from_metadata_file_name) {
                ids.insert(id);
            }
        }

        tracing::debug!(count = ids.len(), "Enumerated wisdoms");
        ids
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn load_metadata(&self, id: WisdomId) -> WisdomResult<Option<WisdomMetadata>> {
        let Some((path, contents)) = self.read_metadata_document(id).await? else {
            tracing::debug!("No metadata document found");
            return Ok(None);
        };

        let metadata = parse_metadata(&path, &contents)?;
        tracing::debug!(
            path = %path.display(),
            present = metadata.is_some(),
            "Loaded metadata document"
        );
        Ok(metadata)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn load_image(&self, id: WisdomId) -> WisdomResult<Option<WisdomImage>> {
        for (extension, format) in IMAGE_EXTENSIONS {
            let path = self.path_for(id, extension);
            if Self::is_file(&path).await? {
                tracing::debug!(path = %path.display(), %format, "Resolved image");
                return Ok(Some(WisdomImage::new(id, path, format)));
            }
        }
        tracing::debug!("No image found");
        Ok(None)
    }

    #[tracing::instrument(skip(self, image), fields(path = %image.path().display()))]
    async fn read_image(&self, image: &WisdomImage) -> WisdomResult<Vec<u8>> {
        let data = tokio::fs::read(image.path()).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                image.path().display(),
                e
            )))
        })?;
        tracing::debug!(size = data.len(), "Read image");
        Ok(data)
    }

    fn root(&self) -> &Path {
        &self.base_path
    }
}
