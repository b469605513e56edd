mod types;

pub use types::*;

use anyhow::{ensure, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Returns the config directory: <platform config dir>/deskvr/
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("deskvr");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the config file path: <platform config dir>/deskvr/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from the default location, or return defaults if not found.
pub fn load_config() -> Result<BridgeConfig> {
    load_config_from(&config_path()?)
}

/// Load config from `path`, or return defaults if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<BridgeConfig> {
    let config = if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: BridgeConfig = toml::from_str(&contents)?;
        info!(?path, "Loaded config");
        config
    } else {
        info!(?path, "No config found, using defaults");
        BridgeConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Save config to the default location.
pub fn save_config(config: &BridgeConfig) -> Result<()> {
    save_config_to(config, &config_path()?)
}

pub fn save_config_to(config: &BridgeConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}

impl BridgeConfig {
    /// Reject values the bridge cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.channel.name.is_empty(), "channel.name must not be empty");
        ensure!(
            self.channel.capacity >= 2,
            "channel.capacity must hold the flag byte and a terminator (got {})",
            self.channel.capacity
        );
        ensure!(
            self.frame.rate_hz.is_finite() && self.frame.rate_hz > 0.0,
            "frame.rate_hz must be positive (got {})",
            self.frame.rate_hz
        );
        Ok(())
    }
}
