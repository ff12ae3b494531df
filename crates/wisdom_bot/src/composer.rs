//! Post text composition.

use crate::RandomSource;
use derive_getters::Getters;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use wisdom_error::ConfigError;
use wisdom_social::Visibility;
use wisdom_store::{WisdomImage, WisdomMetadata};

const SECTION_SEPARATOR: &str = "\n\n";

/// Phrase pools of one locale, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PhrasePools {
    /// Locale of the pools, also used as the post language.
    locale: String,
    /// Openers, one picked per post.
    greetings: Vec<String>,
    /// Closers, one picked per post.
    salutations: Vec<String>,
    /// Hashtags without `#`, all appended to every post.
    tags: Vec<String>,
}

impl PhrasePools {
    /// Create the pools.
    ///
    /// # Errors
    ///
    /// Returns error if either phrase pool is empty.
    pub fn new(
        locale: impl Into<String>,
        greetings: Vec<String>,
        salutations: Vec<String>,
        tags: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let locale = locale.into();
        if greetings.is_empty() {
            return Err(ConfigError::for_key(
                format!("text.greetings.{}", locale),
                "pool is empty",
            ));
        }
        if salutations.is_empty() {
            return Err(ConfigError::for_key(
                format!("text.salutations.{}", locale),
                "pool is empty",
            ));
        }
        Ok(Self {
            locale,
            greetings,
            salutations,
            tags,
        })
    }
}

/// Everything needed to publish one wisdom. Lives for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ComposedPost {
    /// Full body text.
    text: String,
    /// Alt text of the attached image.
    media_alt_text: String,
    /// Image to attach.
    image: WisdomImage,
    /// Language of the text.
    language: String,
    /// Audience.
    visibility: Visibility,
    /// Whether the attachment is marked sensitive.
    sensitive: bool,
    /// Content warning.
    spoiler_text: Option<String>,
}

/// Builds post text from a wisdom and the configured pools.
pub struct Composer {
    pools: Arc<PhrasePools>,
    rng: Mutex<RandomSource>,
}

impl Composer {
    /// Create a composer drawing phrases with `rng`.
    pub fn new(pools: Arc<PhrasePools>, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            pools,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Create a composer seeded from the operating system.
    pub fn from_entropy(pools: Arc<PhrasePools>) -> Self {
        Self::new(pools, StdRng::from_entropy())
    }

    /// The pools this composer draws from.
    pub fn pools(&self) -> &PhrasePools {
        &self.pools
    }

    /// Compose the body text:
    ///
    /// ```text
    /// <greeting>\n\n<wisdom>\n\n<salutation>\n\n#tag1 #tag2
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use std::sync::Arc;
    /// use wisdom_bot::{Composer, PhrasePools};
    /// use wisdom_store::WisdomMetadata;
    ///
    /// let pools = PhrasePools::new(
    ///     "de",
    ///     vec!["Hi".to_string()],
    ///     vec!["Bye".to_string()],
    ///     vec!["sloth".to_string(), "wisdom".to_string()],
    /// )
    /// .unwrap();
    /// let composer = Composer::new(Arc::new(pools), StdRng::seed_from_u64(1));
    /// let metadata = WisdomMetadata::new("Rest more.", "A sloth");
    ///
    /// assert_eq!(
    ///     composer.compose(&metadata),
    ///     "Hi\n\nRest more.\n\nBye\n\n#sloth #wisdom"
    /// );
    /// ```
    pub fn compose(&self, metadata: &WisdomMetadata) -> String {
        let (greeting, salutation) = {
            let mut rng = self.rng.lock();
            (
                pick(&self.pools.greetings, &mut *rng),
                pick(&self.pools.salutations, &mut *rng),
            )
        };

        let tags = self
            .pools
            .tags
            .iter()
            .map(|tag| format!("#{}", tag))
            .collect::<Vec<_>>()
            .join(" ");

        [greeting, metadata.wisdom().as_str(), salutation, tags.as_str()].join(SECTION_SEPARATOR)
    }

    /// Compose the complete post for a wisdom and its image.
    pub fn compose_post(&self, metadata: &WisdomMetadata, image: WisdomImage) -> ComposedPost {
        ComposedPost {
            text: self.compose(metadata),
            media_alt_text: metadata.description().clone(),
            image,
            language: self.pools.locale.clone(),
            visibility: Visibility::Public,
            sensitive: false,
            spoiler_text: None,
        }
    }
}

/// Pools are validated non-empty at construction.
fn pick<'a>(pool: &'a [String], rng: &mut RandomSource) -> &'a str {
    pool.choose(rng).map(String::as_str).unwrap_or_default()
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("pools", &self.pools)
            .finish_non_exhaustive()
    }
}
