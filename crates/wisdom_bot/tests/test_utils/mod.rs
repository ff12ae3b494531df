//! Shared fixtures for wisdom bot tests.

#![allow(dead_code)]

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wisdom_bot::{Composer, PhrasePools, Selector, WisdomJob};
use wisdom_social::{
    MediaRef, MediaUpload, PostId, PostRequest, PublishError, PublishResult, Publisher,
};
use wisdom_store::FileSystemStore;

/// Publisher that records every call instead of talking to a service.
#[derive(Default)]
pub struct RecordingPublisher {
    uploads: Mutex<Vec<MediaUpload>>,
    posts: Mutex<Vec<PostRequest>>,
    upload_error: Option<PublishError>,
    post_error: Option<PublishError>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upload_error(mut self, error: PublishError) -> Self {
        self.upload_error = Some(error);
        self
    }

    pub fn with_post_error(mut self, error: PublishError) -> Self {
        self.post_error = Some(error);
        self
    }

    pub fn uploads(&self) -> Vec<MediaUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<PostRequest> {
        self.posts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.uploads.lock().unwrap().len() + self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn upload_media(&self, upload: &MediaUpload) -> PublishResult<MediaRef> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(upload.clone());
        if let Some(error) = &self.upload_error {
            return Err(error.clone());
        }
        Ok(MediaRef(format!("media-{}", uploads.len())))
    }

    async fn create_post(&self, post: &PostRequest) -> PublishResult<PostId> {
        let mut posts = self.posts.lock().unwrap();
        posts.push(post.clone());
        if let Some(error) = &self.post_error {
            return Err(error.clone());
        }
        Ok(PostId(format!("post-{}", posts.len())))
    }

    fn service_name(&self) -> &str {
        "recording"
    }
}

/// Temporary content store directory.
pub struct StoreFixture {
    pub dir: TempDir,
}

impl StoreFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn write(&self, name: &str, contents: &[u8]) -> &Self {
        std::fs::write(self.dir.path().join(name), contents).expect("write fixture");
        self
    }

    pub fn add_metadata(&self, id: &str, wisdom: &str, description: &str) -> &Self {
        let yaml = format!("wisdom: {}\ndescription: {}\n", wisdom, description);
        self.write(&format!("{}.yaml", id), yaml.as_bytes())
    }

    pub fn add_image(&self, id: &str, extension: &str) -> &Self {
        self.write(&format!("{}.{}", id, extension), extension.as_bytes())
    }

    /// Metadata plus a `.jpg` image.
    pub fn add_wisdom(&self, id: &str, wisdom: &str) -> &Self {
        self.add_metadata(id, wisdom, &format!("Image of wisdom {}", id))
            .add_image(id, "jpg")
    }

    pub fn store(&self) -> FileSystemStore {
        FileSystemStore::new(self.dir.path())
    }
}

pub fn pools() -> PhrasePools {
    PhrasePools::new(
        "de",
        vec!["Hi".to_string()],
        vec!["Bye".to_string()],
        vec!["sloth".to_string(), "wisdom".to_string()],
    )
    .expect("valid pools")
}

pub fn job(fixture: &StoreFixture, publisher: Arc<RecordingPublisher>, seed: u64) -> WisdomJob {
    WisdomJob::new(
        Arc::new(fixture.store()),
        Selector::new(StdRng::seed_from_u64(seed)),
        Composer::new(Arc::new(pools()), StdRng::seed_from_u64(seed.wrapping_add(1))),
        publisher,
    )
}
