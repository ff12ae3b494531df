//! Configuration for the wisdom bot.
//!
//! Loaded once at startup from a TOML file, with `WISDOM__`-prefixed
//! environment variables taking precedence (`WISDOM__SERVICE__ACCESS_TOKEN`
//! overrides `service.access_token`).
//!
//! ```toml
//! [store]
//! directory = "/srv/wisdoms"
//!
//! [schedule]
//! cron = "0 30 7 * * ?"
//! timezone = "Europe/Berlin"
//!
//! [service]
//! endpoint = "https://botsin.space"
//! access_token = "..."
//!
//! [text]
//! locale = "de"
//! tags = "sloth;wisdom"
//!
//! [text.greetings]
//! de = "Guten Morgen!;Hallo zusammen!"
//! en = "Good morning!"
//!
//! [text.salutations]
//! de = "Bis morgen!"
//! en = "See you tomorrow!"
//! ```

use crate::{CronSchedule, PhrasePools};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use wisdom_error::{ConfigError, WisdomResult};
use wisdom_social::MastodonConfig;

/// Cron expression used when none is configured: 07:30 every day.
pub const DEFAULT_CRON: &str = "0 30 7 * * ?";

/// Time zone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "de";

const ENV_PREFIX: &str = "WISDOM";
const ENV_SEPARATOR: &str = "__";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WisdomConfig {
    /// Content store settings
    pub store: StoreConfig,
    /// Trigger settings
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Posting service settings
    pub service: MastodonConfig,
    /// Phrase pools and tags
    pub text: TextConfig,
}

/// Where the wisdoms live.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Root directory of the content store
    pub directory: PathBuf,
}

/// When the job fires.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression with seconds (6 or 7 fields)
    #[serde(default = "default_cron")]
    pub cron: String,
    /// IANA time zone the expression is evaluated in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            timezone: default_timezone(),
        }
    }
}

fn default_cron() -> String {
    DEFAULT_CRON.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

/// Text fragments wrapped around every wisdom.
///
/// Pools and tags are `;`-delimited strings, pools keyed by locale.
#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    /// Locale whose pools are used, also the post's language
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Greeting pools by locale
    #[serde(default)]
    pub greetings: HashMap<String, String>,
    /// Salutation pools by locale
    #[serde(default)]
    pub salutations: HashMap<String, String>,
    /// Hashtags without the leading `#`
    #[serde(default)]
    pub tags: String,
}

/// Split a `;`-delimited list, dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

impl TextConfig {
    /// Build the phrase pools for the configured locale.
    ///
    /// # Errors
    ///
    /// Returns error if the locale has no greeting or salutation pool, or
    /// either pool is empty.
    pub fn phrase_pools(&self) -> Result<PhrasePools, ConfigError> {
        let pool = |pools: &HashMap<String, String>, name: &str| -> Result<Vec<String>, ConfigError> {
            let key = format!("text.{}.{}", name, self.locale);
            let raw = pools
                .get(&self.locale)
                .ok_or_else(|| ConfigError::for_key(&key, "no pool configured for locale"))?;
            let entries = split_list(raw);
            if entries.is_empty() {
                return Err(ConfigError::for_key(&key, "pool is empty"));
            }
            Ok(entries)
        };

        let greetings = pool(&self.greetings, "greetings")?;
        let salutations = pool(&self.salutations, "salutations")?;
        let tags = split_list(&self.tags)
            .into_iter()
            .map(|tag| tag.trim_start_matches('#').to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        PhrasePools::new(self.locale.clone(), greetings, salutations, tags)
    }
}

impl WisdomConfig {
    /// Load configuration from a TOML file plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> WisdomResult<Self> {
        debug!("Loading configuration from file");
        let path = path.as_ref();
        Self::load(
            Config::builder().add_source(File::from(path)),
            &path.display().to_string(),
        )
    }

    /// Load configuration from TOML text plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed.
    pub fn from_toml_str(toml: &str) -> WisdomResult<Self> {
        Self::load(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
            "inline configuration",
        )
    }

    fn load(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        origin: &str,
    ) -> WisdomResult<Self> {
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()
            .map_err(|e| {
                ConfigError::new(format!("Failed to read configuration from {}: {}", origin, e))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Validated phrase pools for the configured locale.
    pub fn phrase_pools(&self) -> Result<PhrasePools, ConfigError> {
        self.text.phrase_pools()
    }

    /// Validated trigger schedule.
    pub fn cron_schedule(&self) -> Result<CronSchedule, ConfigError> {
        CronSchedule::new(&self.schedule.cron, &self.schedule.timezone)
    }

    /// Check every value that is otherwise only validated on use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.phrase_pools()?;
        self.cron_schedule()?;
        if self.service.endpoint.trim().is_empty() {
            return Err(ConfigError::for_key("service.endpoint", "must not be empty"));
        }
        if self.service.access_token.trim().is_empty() {
            return Err(ConfigError::for_key("service.access_token", "must not be empty"));
        }
        if self.service.timeout_seconds == 0 {
            return Err(ConfigError::for_key(
                "service.timeout_seconds",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[store]
directory = "/srv/wisdoms"

[schedule]
cron = "0 0 9 * * *"
timezone = "America/New_York"

[service]
endpoint = "https://botsin.space"
access_token = "token"
timeout_seconds = 30

[text]
locale = "en"
tags = "sloth; #wisdom;;faultier"

[text.greetings]
de = "Guten Morgen!;Hallo!"
en = "Good morning!"

[text.salutations]
de = "Bis morgen!"
en = "See you tomorrow!;Take care!"
"#;

    const MINIMAL: &str = r#"
[store]
directory = "wisdoms"

[service]
endpoint = "https://botsin.space"
access_token = "token"

[text.greetings]
de = "Moin"

[text.salutations]
de = "Tschüss"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = WisdomConfig::from_toml_str(FULL).expect("Valid TOML");

        assert_eq!(config.store.directory, PathBuf::from("/srv/wisdoms"));
        assert_eq!(config.schedule.cron, "0 0 9 * * *");
        assert_eq!(config.schedule.timezone, "America/New_York");
        assert_eq!(config.service.timeout_seconds, 30);
        assert_eq!(config.text.locale, "en");
        config.validate().expect("Valid configuration");
    }

    #[test]
    fn test_default_values() {
        let config = WisdomConfig::from_toml_str(MINIMAL).expect("Valid TOML");

        assert_eq!(config.schedule.cron, DEFAULT_CRON);
        assert_eq!(config.schedule.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.text.locale, DEFAULT_LOCALE);
        assert_eq!(config.service.access_token, "token");
        assert_eq!(
            config.service.timeout_seconds,
            wisdom_social::DEFAULT_TIMEOUT_SECONDS
        );
        assert!(config.text.tags.is_empty());
        config.validate().expect("Valid configuration");
    }

    #[test]
    fn test_phrase_pools_follow_locale() {
        let config = WisdomConfig::from_toml_str(FULL).expect("Valid TOML");
        let pools = config.phrase_pools().expect("Valid pools");

        assert_eq!(pools.locale(), "en");
        assert_eq!(pools.greetings(), &vec!["Good morning!".to_string()]);
        assert_eq!(pools.salutations().len(), 2);
        assert_eq!(
            pools.tags(),
            &vec![
                "sloth".to_string(),
                "wisdom".to_string(),
                "faultier".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_locale_pool_is_error() {
        let mut config = WisdomConfig::from_toml_str(MINIMAL).expect("Valid TOML");
        config.text.locale = "fr".to_string();

        let err = config.phrase_pools().unwrap_err();
        assert_eq!(err.key.as_deref(), Some("text.greetings.fr"));
    }

    #[test]
    fn test_empty_pool_is_error() {
        let mut config = WisdomConfig::from_toml_str(MINIMAL).expect("Valid TOML");
        config
            .text
            .salutations
            .insert("de".to_string(), " ; ;".to_string());

        let err = config.validate().unwrap_err();
        assert_eq!(err.key.as_deref(), Some("text.salutations.de"));
    }

    #[test]
    fn test_invalid_timezone_is_error() {
        let mut config = WisdomConfig::from_toml_str(MINIMAL).expect("Valid TOML");
        config.schedule.timezone = "Mars/Olympus_Mons".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let toml = MINIMAL.replace(
            "access_token = \"token\"",
            "access_token = \"token\"\ntimeout_seconds = 0",
        );
        let config = WisdomConfig::from_toml_str(&toml).expect("Valid TOML");
        assert_eq!(config.service.timeout_seconds, 0);

        let err = config.validate().unwrap_err();
        assert_eq!(err.key.as_deref(), Some("service.timeout_seconds"));
    }

    #[test]
    fn test_missing_store_is_error() {
        let toml = r#"
[service]
endpoint = "https://botsin.space"
access_token = "token"

[text]
"#;
        assert!(WisdomConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a;b; c ;;"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
