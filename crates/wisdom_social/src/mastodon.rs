//! Mastodon implementation of the publisher boundary.

use crate::{MediaRef, MediaUpload, PostId, PostRequest, PublishResult, Publisher, Visibility};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use wisdom_error::{ConfigError, PublishError, WisdomResult};

/// Timeout applied to each request unless configured otherwise.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 240;

const MEDIA_PATH: &str = "/api/v2/media";
const STATUSES_PATH: &str = "/api/v1/statuses";

/// Connection settings for a Mastodon instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MastodonConfig {
    /// Base URL of the instance, e.g. `https://botsin.space`
    pub endpoint: String,
    /// Access token of the bot account
    #[serde(alias = "accessToken")]
    pub access_token: String,
    /// Timeout for each request in seconds
    #[serde(default = "default_timeout_seconds", alias = "timeoutSeconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl MastodonConfig {
    /// Create settings with the default timeout.
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for MastodonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MastodonConfig")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    status: &'a str,
    media_ids: Vec<&'a str>,
    visibility: Visibility,
    sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    spoiler_text: Option<&'a str>,
    language: &'a str,
}

/// Publisher posting statuses to a Mastodon instance.
///
/// One `reqwest` client is built at construction with the configured
/// timeout and reused for every call.
#[derive(Debug, Clone)]
pub struct MastodonPublisher {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MastodonPublisher {
    /// Create a publisher for the configured instance.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint or token is empty, the timeout is zero,
    /// or the HTTP client cannot be built.
    #[instrument(skip(config), fields(endpoint = %config.endpoint))]
    pub fn new(config: &MastodonConfig) -> WisdomResult<Self> {
        let base_url = config.endpoint.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::for_key("service.endpoint", "must not be empty").into());
        }
        if config.access_token.trim().is_empty() {
            return Err(ConfigError::for_key("service.access_token", "must not be empty").into());
        }
        if config.timeout_seconds == 0 {
            return Err(
                ConfigError::for_key("service.timeout_seconds", "must be greater than zero").into(),
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            timeout_seconds = config.timeout_seconds,
            "Mastodon publisher created"
        );

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a response into the id it carries, or into a rejection.
    async fn read_id(response: Response, operation: &str) -> PublishResult<String> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .ok()
                .filter(|m| !m.is_empty())
                .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            error!(status = %status, %message, operation, "Mastodon rejected request");
            return Err(PublishError::rejected(status.as_u16(), message));
        }

        let parsed: IdResponse = response.json().await.map_err(|e| {
            PublishError::new(
                Some(status.as_u16()),
                format!("Unexpected {} response", operation),
                Some(e.to_string()),
            )
        })?;
        Ok(parsed.id)
    }
}

#[async_trait]
impl Publisher for MastodonPublisher {
    #[instrument(skip(self, upload), fields(file = %upload.file_name(), size = upload.data().len()))]
    async fn upload_media(&self, upload: &MediaUpload) -> PublishResult<MediaRef> {
        debug!("Uploading media to Mastodon");

        let part = Part::bytes(upload.data().clone())
            .file_name(upload.file_name().clone())
            .mime_str(upload.mime_type())
            .map_err(|e| PublishError::transport("Invalid MIME type for upload", e))?;
        let form = Form::new()
            .part("file", part)
            .text("description", upload.alt_text().clone());

        let response = self
            .client
            .post(self.url(MEDIA_PATH))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::transport("Media upload failed", e))?;

        let id = Self::read_id(response, "media upload").await?;
        debug!(media_id = %id, "Media uploaded");
        Ok(MediaRef(id))
    }

    #[instrument(skip(self, post), fields(text_len = post.text().len(), media = post.media().len()))]
    async fn create_post(&self, post: &PostRequest) -> PublishResult<PostId> {
        debug!("Creating Mastodon status");

        let body = StatusBody {
            status: post.text(),
            media_ids: post.media().iter().map(|m| m.0.as_str()).collect(),
            visibility: *post.visibility(),
            sensitive: *post.sensitive(),
            spoiler_text: post.spoiler_text().as_deref(),
            language: post.language(),
        };

        let response = self
            .client
            .post(self.url(STATUSES_PATH))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::transport("Status creation failed", e))?;

        let id = Self::read_id(response, "status").await?;
        debug!(post_id = %id, "Status created");
        Ok(PostId(id))
    }

    fn service_name(&self) -> &str {
        "mastodon"
    }
}
