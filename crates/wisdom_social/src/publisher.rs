//! Publisher trait and the values crossing it.

use async_trait::async_trait;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use wisdom_error::PublishError;

/// Result type for publisher operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Service-assigned identifier of an uploaded media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct MediaRef(pub String);

/// Service-assigned identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct PostId(pub String);

/// Audience of a post.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone, shown in public timelines.
    #[default]
    #[display("public")]
    Public,
    /// Visible to everyone, hidden from public timelines.
    #[display("unlisted")]
    Unlisted,
    /// Followers only.
    #[display("private")]
    Private,
    /// Mentioned accounts only.
    #[display("direct")]
    Direct,
}

/// An image to upload.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct MediaUpload {
    /// Raw file contents.
    data: Vec<u8>,
    /// File name reported to the service.
    file_name: String,
    /// MIME type of `data`.
    mime_type: String,
    /// Alt text for accessibility.
    alt_text: String,
}

/// A post to create.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct PostRequest {
    /// Body text.
    text: String,
    /// Attachments, in display order.
    #[builder(default)]
    media: Vec<MediaRef>,
    /// Audience.
    #[builder(default)]
    visibility: Visibility,
    /// Whether the attachments are marked sensitive.
    #[builder(default)]
    sensitive: bool,
    /// Content warning shown in front of the text.
    #[builder(default, setter(into, strip_option))]
    spoiler_text: Option<String>,
    /// ISO 639 language of the text.
    language: String,
}

/// Boundary to the external posting service.
///
/// Each call is exactly one attempt. Implementations never retry, and any
/// transport or service-side rejection is returned as a [`PublishError`].
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload an image and return the reference needed to attach it.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The service cannot be reached or times out
    /// - The format is unsupported or the file too large
    /// - Authentication fails
    async fn upload_media(&self, upload: &MediaUpload) -> PublishResult<MediaRef>;

    /// Create a post and return its id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The service cannot be reached or times out
    /// - The text is too long or violates instance policy
    /// - A media reference is unknown
    async fn create_post(&self, post: &PostRequest) -> PublishResult<PostId>;

    /// Short name of the service, for logging.
    fn service_name(&self) -> &str;
}
