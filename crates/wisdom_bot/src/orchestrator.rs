//! One end-to-end posting run.
//!
//! A run moves through
//!
//! ```text
//! Idle -> Selecting -> Loading -> Composing -> Publishing -> Done
//!             |           |                        |
//!             +-----------+--> Aborted             +--> Failed
//! ```
//!
//! and keeps no state once it reaches one of the three terminal states.
//! Aborted and Failed are ordinary outcomes: the caller receives them as
//! values and nothing is propagated. Only unexpected store I/O comes back as
//! an error.

use crate::{ComposedPost, Composer, Selector};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use wisdom_error::{PublishError, WisdomResult};
use wisdom_social::{MediaUploadBuilder, PostId, PostRequestBuilder, PublishResult, Publisher};
use wisdom_store::{WisdomId, WisdomStore};

/// Phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RunState {
    /// Not started.
    Idle,
    /// Enumerating and picking a candidate.
    Selecting,
    /// Reading metadata and resolving the image.
    Loading,
    /// Building the post text.
    Composing,
    /// Uploading the image and creating the post.
    Publishing,
    /// Post created.
    Done,
    /// Stopped before publishing because something was absent.
    Aborted,
    /// The posting service rejected the upload or the post.
    Failed,
}

/// Why a run stopped before publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AbortReason {
    /// The store has no wisdoms.
    #[display("empty wisdom set")]
    EmptyWisdomSet,
    /// The selected wisdom has no usable metadata document.
    #[display("missing metadata")]
    MissingMetadata,
    /// The selected wisdom has no image.
    #[display("missing image")]
    MissingImage,
}

/// Terminal state of a run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The wisdom was posted.
    Done {
        /// Posted wisdom.
        id: WisdomId,
        /// Id of the new post.
        post_id: PostId,
    },
    /// Nothing was published.
    Aborted {
        /// Selected wisdom, if selection got that far.
        id: Option<WisdomId>,
        /// What was missing.
        reason: AbortReason,
    },
    /// Publishing was attempted and rejected.
    Failed {
        /// Wisdom that failed to post.
        id: WisdomId,
        /// The rejection.
        error: PublishError,
    },
}

impl RunOutcome {
    /// Terminal state this outcome represents.
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Done { .. } => RunState::Done,
            RunOutcome::Aborted { .. } => RunState::Aborted,
            RunOutcome::Failed { .. } => RunState::Failed,
        }
    }

    /// Wisdom the run worked on, if any was selected.
    pub fn id(&self) -> Option<WisdomId> {
        match self {
            RunOutcome::Done { id, .. } | RunOutcome::Failed { id, .. } => Some(*id),
            RunOutcome::Aborted { id, .. } => *id,
        }
    }
}

/// The daily job: select, load, compose, publish.
///
/// Holds no per-run state, so concurrent calls to [`WisdomJob::run`] do not
/// interfere beyond sharing the random sources.
pub struct WisdomJob {
    store: Arc<dyn WisdomStore>,
    selector: Selector,
    composer: Composer,
    publisher: Arc<dyn Publisher>,
}

impl std::fmt::Debug for WisdomJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WisdomJob")
            .field("store", &self.store.root())
            .field("selector", &self.selector)
            .field("composer", &self.composer)
            .field("publisher", &self.publisher.service_name())
            .finish()
    }
}

impl WisdomJob {
    /// Wire a job from its collaborators.
    pub fn new(
        store: Arc<dyn WisdomStore>,
        selector: Selector,
        composer: Composer,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            store,
            selector,
            composer,
            publisher,
        }
    }

    /// The store this job reads from.
    pub fn store(&self) -> &Arc<dyn WisdomStore> {
        &self.store
    }

    /// Execute one run.
    ///
    /// Absences end the run as [`RunOutcome::Aborted`] and publishing
    /// failures as [`RunOutcome::Failed`]; neither is an `Err`.
    ///
    /// # Errors
    ///
    /// Returns error only for unexpected store I/O, such as a file that
    /// vanished or became unreadable between enumeration and reading.
    #[instrument(skip(self), fields(store = %self.store.root().display()))]
    pub async fn run(&self) -> WisdomResult<RunOutcome> {
        info!("Going to post new wisdom");

        transition(RunState::Idle, RunState::Selecting);
        let candidates = self.store.enumerate_candidates().await;
        info!(count = candidates.len(), "Wisdoms available");

        let Some(id) = self.selector.select(&candidates) else {
            return Ok(abort(None, AbortReason::EmptyWisdomSet));
        };
        debug!(%id, "Selected wisdom");

        transition(RunState::Selecting, RunState::Loading);
        let Some(metadata) = self.store.load_metadata(id).await? else {
            return Ok(abort(Some(id), AbortReason::MissingMetadata));
        };
        let Some(image) = self.store.load_image(id).await? else {
            return Ok(abort(Some(id), AbortReason::MissingImage));
        };

        transition(RunState::Loading, RunState::Composing);
        let post = self.composer.compose_post(&metadata, image);

        transition(RunState::Composing, RunState::Publishing);
        info!(%id, "Posting wisdom");
        let outcome = match self.publish(&post).await? {
            Ok(post_id) => {
                info!(%id, %post_id, "Wisdom successfully posted");
                RunOutcome::Done { id, post_id }
            }
            Err(error) => {
                error!(
                    %id,
                    status = ?error.status,
                    detail = %error.message,
                    cause = ?error.cause,
                    "Posting wisdom failed"
                );
                RunOutcome::Failed { id, error }
            }
        };
        transition(RunState::Publishing, outcome.state());
        Ok(outcome)
    }

    /// Upload the image, then create the post with it attached.
    ///
    /// The outer result carries store faults, the inner one the service's answer.
    async fn publish(&self, post: &ComposedPost) -> WisdomResult<PublishResult<PostId>> {
        let data = self.store.read_image(post.image()).await?;

        let upload = match MediaUploadBuilder::default()
            .data(data)
            .file_name(post.image().file_name())
            .mime_type(post.image().format().mime_type())
            .alt_text(post.media_alt_text().clone())
            .build()
        {
            Ok(upload) => upload,
            Err(e) => {
                return Ok(Err(PublishError::new(
                    None,
                    "Invalid media upload",
                    Some(e.to_string()),
                )));
            }
        };

        let media = match self.publisher.upload_media(&upload).await {
            Ok(media) => media,
            Err(e) => return Ok(Err(e)),
        };
        debug!(media_id = %media, "Image uploaded");

        let mut request = PostRequestBuilder::default();
        request
            .text(post.text().clone())
            .media(vec![media])
            .visibility(*post.visibility())
            .sensitive(*post.sensitive())
            .language(post.language().clone());
        if let Some(spoiler_text) = post.spoiler_text() {
            request.spoiler_text(spoiler_text.clone());
        }
        let request = match request.build() {
            Ok(request) => request,
            Err(e) => {
                return Ok(Err(PublishError::new(
                    None,
                    "Invalid post request",
                    Some(e.to_string()),
                )));
            }
        };

        Ok(self.publisher.create_post(&request).await)
    }
}

fn transition(from: RunState, to: RunState) {
    debug!(%from, %to, "Run state changed");
}

fn abort(id: Option<WisdomId>, reason: AbortReason) -> RunOutcome {
    match id {
        Some(id) => warn!(%id, %reason, "Aborting wisdom run"),
        None => warn!(%reason, "Aborting wisdom run"),
    }
    transition(
        if id.is_some() {
            RunState::Loading
        } else {
            RunState::Selecting
        },
        RunState::Aborted,
    );
    RunOutcome::Aborted { id, reason }
}
