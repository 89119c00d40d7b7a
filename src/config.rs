use crate::constants::{
    CONFIG_PATH_ENV, DB_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_DB_PATH, DEFAULT_DELAY_MS, DEFAULT_PAGES,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_TOP, DEFAULT_USER_AGENT,
};
use crate::error::{PredictorError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub harvester: HarvesterConfig,
    pub predict: PredictConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvesterConfig {
    pub delay_ms: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub pages: Vec<String>,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pages: DEFAULT_PAGES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl HarvesterConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    pub top: usize,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self { top: DEFAULT_TOP }
    }
}

impl Config {
    /// Loads `config.toml` (or the file named by `EMAIL_PREDICTOR_CONFIG`),
    /// falling back to defaults when it does not exist, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(&config_path)?;
        if let Ok(db_path) = std::env::var(DB_PATH_ENV) {
            config.storage.db_path = db_path;
        }
        Ok(config)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            PredictorError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.storage.db_path.trim().is_empty() {
            return Err(PredictorError::Config("storage.db_path must not be empty".into()));
        }
        if self.harvester.timeout_seconds == 0 {
            return Err(PredictorError::Config("harvester.timeout_seconds must be positive".into()));
        }
        Ok(())
    }
}
