//! Runtime settings.
//!
//! Sources, later ones winning: built-in defaults, an optional `weather_trends.{toml,json,yaml}`
//! in the working directory, `WEATHER_TRENDS_*` environment variables such as
//! `WEATHER_TRENDS_OUTPUT_DIR`, and finally the geocoding key from `APIKEY` in the
//! environment or in a `.env` file.

use crate::archive::client::DEFAULT_ARCHIVE_URL;
use crate::fetch::error::FetchError;
use crate::fetch::retry::{RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_RETRIES};
use crate::fetch::session::DEFAULT_TIMEOUT_SECS;
use crate::geocode::client::{DEFAULT_GEOCODE_URL, DEFAULT_REGION};
use crate::types::variable::UnitSystem;
use crate::utils::get_cache_dir;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "weather_trends";
pub const ENV_PREFIX: &str = "WEATHER_TRENDS";
pub const API_KEY_VAR: &str = "APIKEY";
pub const DOTENV_FILE: &str = ".env";

/// Longest point plot, in days between start and end date.
pub const DEFAULT_MAX_POINT_SPAN_DAYS: i64 = 31;
/// Longest trend plot, roughly ten years.
pub const DEFAULT_MAX_TREND_SPAN_DAYS: i64 = 3653;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// geocode.xyz auth key. Requests go out without one if unset.
    #[serde(rename = "apikey", default)]
    pub api_key: Option<String>,
    pub archive_base_url: String,
    pub geocode_base_url: String,
    pub geocode_region: String,
    /// Where archive responses are cached. Defaults to the system cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Skip the response cache entirely.
    #[serde(default)]
    pub no_cache: bool,
    pub retries: u32,
    pub backoff_factor: f64,
    pub timeout_secs: u64,
    pub units: UnitSystem,
    pub max_point_span_days: i64,
    pub max_trend_span_days: i64,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            archive_base_url: DEFAULT_ARCHIVE_URL.to_string(),
            geocode_base_url: DEFAULT_GEOCODE_URL.to_string(),
            geocode_region: DEFAULT_REGION.to_string(),
            cache_dir: None,
            no_cache: false,
            retries: DEFAULT_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            units: UnitSystem::default(),
            max_point_span_days: DEFAULT_MAX_POINT_SPAN_DAYS,
            max_trend_span_days: DEFAULT_MAX_TREND_SPAN_DAYS,
            output_dir: PathBuf::from("plots"),
        }
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    let defaults = Settings::default();
    Config::builder()
        .set_default("archive_base_url", defaults.archive_base_url)?
        .set_default("geocode_base_url", defaults.geocode_base_url)?
        .set_default("geocode_region", defaults.geocode_region)?
        .set_default("no_cache", defaults.no_cache)?
        .set_default("retries", i64::from(defaults.retries))?
        .set_default("backoff_factor", defaults.backoff_factor)?
        .set_default("timeout_secs", defaults.timeout_secs as i64)?
        .set_default("units", "imperial")?
        .set_default("max_point_span_days", defaults.max_point_span_days)?
        .set_default("max_trend_span_days", defaults.max_trend_span_days)?
        .set_default("output_dir", "plots")
}

impl Settings {
    /// Loads settings from the working directory and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map_or_else(|| dotenv_api_key(Path::new(DOTENV_FILE)), |k| Ok(Some(k)))?;

        let config = with_defaults()?
            .add_source(File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("apikey", api_key)?
            .build()?;
        Self::from_config(config)
    }

    /// Loads settings from a single file on top of the defaults, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = with_defaults()?.add_source(File::from(path)).build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 0.0 {
            return Err(ConfigError::Invalid {
                key: "backoff_factor",
                reason: format!("must be a non-negative number, got {}", self.backoff_factor),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        for (key, days) in [
            ("max_point_span_days", self.max_point_span_days),
            ("max_trend_span_days", self.max_trend_span_days),
        ] {
            if days < 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("must not be negative, got {days}"),
                });
            }
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.backoff_factor)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured cache directory, or `<system cache dir>/weather_trends_cache`.
    pub fn resolved_cache_dir(&self) -> Result<PathBuf, FetchError> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_cache_dir(),
        }
    }
}

/// `APIKEY` from a `key=value` file, if the file exists and sets it.
fn dotenv_api_key(path: &Path) -> Result<Option<String>, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini).required(false))
        .build()?;
    let key = [API_KEY_VAR, "apikey"]
        .iter()
        .find_map(|name| config.get_string(name).ok())
        .map(|k| k.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|k| !k.is_empty());
    Ok(key)
}
