use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::converter::{CACHE_DURATION, ConverterSettings, DEFAULT_RATE, RefreshPolicy};
use crate::providers::exchangerate_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeRateApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExchangeRateApiConfig {
    fn default() -> Self {
        ExchangeRateApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExchangeRateApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub exchangerate_api: ExchangeRateApiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_rate")]
    pub default_rate: f64,
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_rate() -> f64 {
    DEFAULT_RATE
}

fn default_cache_duration_secs() -> u64 {
    CACHE_DURATION.as_secs()
}

fn default_precision() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_rate: default_rate(),
            cache_duration_secs: default_cache_duration_secs(),
            precision: default_precision(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "inr-usd", "inr-usd-converter")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn converter_settings(&self, policy: RefreshPolicy) -> ConverterSettings {
        ConverterSettings {
            default_rate: self.default_rate,
            cache_duration: Duration::from_secs(self.cache_duration_secs),
            policy,
        }
    }
}
