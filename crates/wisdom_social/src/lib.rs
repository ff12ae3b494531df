//! Publishing wisdoms to a social network.
//!
//! - **Publisher**: trait-based boundary to the posting service
//! - **MastodonPublisher**: the production adapter over the Mastodon REST API
//!
//! The orchestration code only ever sees [`Publisher`], so tests can swap in
//! a recording fake without any network access.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod mastodon;
mod publisher;

pub use mastodon::{DEFAULT_TIMEOUT_SECONDS, MastodonConfig, MastodonPublisher};
pub use publisher::{
    MediaRef, MediaUpload, MediaUploadBuilder, PostId, PostRequest, PostRequestBuilder,
    PublishResult, Publisher, Visibility,
};
pub use wisdom_error::PublishError;
