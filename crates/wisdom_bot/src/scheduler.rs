//! Fires the wisdom job on its schedule.

use crate::{RunOutcome, Schedule, WisdomJob};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Runs a [`WisdomJob`] at every firing of a [`Schedule`].
///
/// Each run is spawned as its own task and awaited before the next firing is
/// computed, so runs never overlap and a run that errors or panics is logged
/// without taking the scheduler down.
pub struct Scheduler<S: Schedule> {
    schedule: S,
    job: Arc<WisdomJob>,
}

impl<S: Schedule> Scheduler<S> {
    /// Create a scheduler for `job`.
    pub fn new(schedule: S, job: Arc<WisdomJob>) -> Self {
        Self { schedule, job }
    }

    /// The schedule driving this scheduler.
    pub fn schedule(&self) -> &S {
        &self.schedule
    }

    /// Run until `shutdown` resolves or the schedule is exhausted.
    ///
    /// Shutdown is honoured while waiting for the next firing; a run that has
    /// already started is allowed to finish.
    ///
    /// Returns the number of runs fired.
    #[instrument(skip_all)]
    pub async fn run_until<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut fired = 0;

        loop {
            let now = Utc::now();
            let Some(next) = self.schedule.next_execution(now) else {
                warn!("Schedule has no further firings");
                break;
            };
            info!(next = %self.schedule.describe(next), "Next wisdom scheduled");

            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Scheduler shutting down");
                    break;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            self.fire().await;
            fired += 1;
        }

        fired
    }

    /// Run the job once, containing any failure.
    ///
    /// Returns the outcome, or `None` if the run ended abnormally.
    pub async fn fire(&self) -> Option<RunOutcome> {
        let job = Arc::clone(&self.job);
        match tokio::spawn(async move { job.run().await }).await {
            Ok(Ok(outcome)) => Some(outcome),
            Ok(Err(e)) => {
                error!(error = %e, "Wisdom run ended abnormally");
                None
            }
            Err(e) => {
                error!(error = %e, "Wisdom run panicked");
                None
            }
        }
    }
}
