use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::cache::city_file_stem;

/// Environment variable that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Settings injected at startup.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// cache_dir = "/var/tmp/weather"
/// max_age_minutes = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key. Blank unless configured.
    pub api_key: Option<String>,

    /// Base of the WeatherAPI endpoints, without the trailing `/history.json`.
    pub base_url: String,

    /// Directory holding one CSV per city.
    pub cache_dir: PathBuf,

    /// A cache file older than this is refetched.
    pub max_age_minutes: u64,

    /// Directory the temperature charts are written to.
    pub plot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from("weather_data"),
            max_age_minutes: 60,
            plot_dir: PathBuf::from("weather_data"),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, then apply `WEATHERAPI_KEY`.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = Self::load_from(&path)?;

        Ok(cfg.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load config from `path`, or return the defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-history", "weather-history")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the API key when `key` is present and non-blank.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Returns the API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_minutes.saturating_mul(60))
    }

    /// Where the chart for `city` is written.
    pub fn plot_path(&self, city: &str) -> PathBuf {
        self.plot_dir.join(format!("{}_temperature.png", city_file_stem(city)))
    }
}
