use crate::core::calculator::ValidationPolicy;
use crate::core::scenario::ScenarioMode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BCB_BASE_URL: &str = "https://api.bcb.gov.br";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BcbProviderConfig {
    pub base_url: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    60 * 60
}

impl Default for BcbProviderConfig {
    fn default() -> Self {
        BcbProviderConfig {
            base_url: DEFAULT_BCB_BASE_URL.to_string(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub bcb: BcbProviderConfig,
}

/// Values used when a command does not set them explicitly.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_mode")]
    pub mode: ScenarioMode,
    #[serde(default = "default_principal")]
    pub principal: f64,
    #[serde(default)]
    pub fixed_rate: f64,
}

fn default_mode() -> ScenarioMode {
    ScenarioMode::IndexPlusFixed
}

fn default_principal() -> f64 {
    1000.0
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            mode: default_mode(),
            principal: default_principal(),
            fixed_rate: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub validation: ValidationPolicy,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Loads the config at the default location, falling back to built-in
    /// defaults when no file has been set up.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "indexa", "indexa")
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
}
