// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{VaduError, Result};
use config::{Config, ConfigBuilder, Environment, File};
use config::builder::DefaultState;
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. `VADU_CLIENT_TOKEN` / `VADU_COOKIE` (highest)
    /// 2. Environment variables (prefix: `VADU_`, nested with `__`)
    /// 3. Config file (`~/.vadu/config.toml`)
    /// 4. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_config_path())
    }

    /// Same as [`AppConfig::load`] but reads the given file instead of the default one.
    /// A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().to_string();

        let builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(&path).required(false))
            // Override with environment variables (VADU_SESSION__API_ENDPOINT, ...)
            .add_source(
                Environment::with_prefix("VADU")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = Self::with_legacy_overrides(builder)?
            .build()
            .map_err(|e| VaduError::Config(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| VaduError::Config(e.to_string()))?;
        loaded.session.validate()?;
        Ok(loaded)
    }

    /// Short variable names for the two secrets, taking precedence over everything else.
    fn with_legacy_overrides(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>> {
        let identity = std::env::var("VADU_CLIENT_TOKEN").ok();
        let cookie = std::env::var("VADU_COOKIE").ok();

        Ok(builder
            .set_override_option("session.client_identity", identity)?
            .set_override_option("session.cookie", cookie)?)
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vadu")
            .join("config.toml")
    }
}
