//! Client configuration loading.
//!
//! Priority: environment variables > `config.toml` > built-in defaults.

use crate::paths::MediflowPaths;
use mediflow_core::config::ClientConfig;
use mediflow_core::error::{MediflowError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "MEDIFLOW_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEDIFLOW_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "MEDIFLOW_LOG_LEVEL";

pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    /// Uses `config.toml` in the platform config directory.
    pub fn new(paths: &MediflowPaths) -> Result<Self> {
        Ok(Self {
            config_path: paths.config_file()?,
        })
    }

    pub fn with_path(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Loads the file (defaults if absent) and applies environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.config_path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {:?}, using defaults",
                self.config_path
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::info!("[ConfigService] Loaded config from {:?}", self.config_path);
        Ok(config)
    }
}

fn apply_overrides(
    config: &mut ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.base_url = url.trim().to_string();
    }

    if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
        config.request_timeout_secs = secs.trim().parse().map_err(|_| {
            MediflowError::config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
        })?;
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
        config.log_level = level.trim().to_string();
    }

    Ok(())
}
