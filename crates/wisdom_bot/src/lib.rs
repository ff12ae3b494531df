//! Daily wisdom posting.
//!
//! Once a day a random wisdom is picked from the content store, wrapped in a
//! greeting, a salutation, and hashtags, and posted with its image.
//!
//! # Architecture
//!
//! - **Selector**: uniform random choice among the candidates
//! - **Composer**: post text from metadata and phrase pools
//! - **WisdomJob**: one run from selection to publishing
//! - **Scheduler**: fires the job on a cron schedule in a fixed time zone
//!
//! Everything is constructed explicitly and passed in; the job knows the
//! store and the publisher only through their traits.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wisdom_bot::{Composer, Scheduler, Selector, WisdomConfig, WisdomJob};
//! use wisdom_social::MastodonPublisher;
//! use wisdom_store::FileSystemStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WisdomConfig::from_file("wisdom.toml")?;
//! let job = WisdomJob::new(
//!     Arc::new(FileSystemStore::new(&config.store.directory)),
//!     Selector::from_entropy(),
//!     Composer::from_entropy(Arc::new(config.phrase_pools()?)),
//!     Arc::new(MastodonPublisher::new(&config.service)?),
//! );
//!
//! let scheduler = Scheduler::new(config.cron_schedule()?, Arc::new(job));
//! scheduler.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod composer;
mod config;
mod orchestrator;
mod schedule;
mod scheduler;
mod selector;

pub use composer::{ComposedPost, Composer, PhrasePools};
pub use self::config::{
    DEFAULT_CRON, DEFAULT_LOCALE, DEFAULT_TIMEZONE, ScheduleConfig, StoreConfig, TextConfig,
    WisdomConfig, split_list,
};
pub use orchestrator::{AbortReason, RunOutcome, RunState, WisdomJob};
pub use schedule::{CronSchedule, Schedule};
pub use scheduler::Scheduler;
pub use selector::{RandomSource, Selector};
