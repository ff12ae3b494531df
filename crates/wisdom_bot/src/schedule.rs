//! Trigger schedules.
//!
//! A [`Schedule`] only answers "when is the next firing after this instant".
//! Waiting and running the job is the [`Scheduler`](crate::Scheduler)'s business,
//! which keeps both halves testable on their own.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use wisdom_error::ConfigError;

/// Trait for schedule types that can determine when the job fires.
pub trait Schedule: Send + Sync {
    /// Calculate the next firing strictly after a given reference time.
    ///
    /// # Arguments
    ///
    /// * `after` - Reference time to calculate the next firing from
    ///
    /// # Returns
    ///
    /// Next firing time, or None if the schedule is exhausted
    fn next_execution(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Render a firing time for logs.
    fn describe(&self, at: DateTime<Utc>) -> String {
        at.to_rfc3339()
    }
}

/// Cron expression evaluated on the wall clock of a fixed time zone.
///
/// Expressions have six or seven fields (`sec min hour day month weekday
/// [year]`). The Quartz placeholder `?` is accepted and means "any".
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wisdom_bot::{CronSchedule, Schedule};
///
/// let schedule = CronSchedule::new("0 30 7 * * ?", "Europe/Berlin").unwrap();
///
/// // 07:30 in Berlin is 05:30 UTC in summer.
/// let after = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
/// let next = schedule.next_execution(after).unwrap();
/// assert_eq!(next, Utc.with_ymd_and_hms(2024, 7, 1, 5, 30, 0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: cron::Schedule,
    timezone: Tz,
}

impl CronSchedule {
    /// Parse a cron expression and an IANA time zone name.
    ///
    /// # Errors
    ///
    /// Returns error if either value does not parse.
    pub fn new(expression: &str, timezone: &str) -> Result<Self, ConfigError> {
        let normalized = expression.trim().replace('?', "*");
        let schedule = cron::Schedule::from_str(&normalized).map_err(|e| {
            ConfigError::for_key("schedule.cron", format!("invalid expression '{}': {}", expression, e))
        })?;
        let timezone = Tz::from_str(timezone.trim()).map_err(|e| {
            ConfigError::for_key("schedule.timezone", format!("unknown time zone '{}': {}", timezone, e))
        })?;

        Ok(Self {
            expression: expression.trim().to_string(),
            schedule,
            timezone,
        })
    }

    /// The expression as configured.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Zone the expression is evaluated in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl Schedule for CronSchedule {
    fn next_execution(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
            .map(|next| next.with_timezone(&Utc))
    }

    fn describe(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone).to_rfc3339()
    }
}
