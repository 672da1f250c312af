//! Configuration loading and path resolution.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::builder::create_default_config;
use super::validation::validate_config;

/// Custom configuration directory, set once at startup from `--config`.
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process. Can only be
/// called once, typically during argument handling.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow!("Configuration directory already set"))
}

/// The custom configuration directory, if one was set.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path of the configuration file: `<config dir>/brightr.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(dir) = get_custom_config_dir() {
        return Ok(dir.join("brightr.toml"));
    }
    let base = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(base.join("brightr").join("brightr.toml"))
}

/// Load the configuration, creating a commented default file on first run.
pub fn load() -> Result<Config> {
    let path = get_config_path()?;
    if !path.exists() {
        create_default_config(&path)?;
        log_indented!("Created default configuration: {}", path.display());
    }
    load_from_path(&path)
}

/// Load and validate the configuration at an explicit path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Invalid TOML in config file: {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}
