//! Configuration loading from file system

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::types::BridgeConfig;
use crate::error::{BridgeError, Result};

/// Default config location: `<platform config dir>/abbrev-bridge/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read and parse a JSON config file. `~` in the path is expanded.
pub fn try_load_config(path: impl AsRef<Path>) -> Result<BridgeConfig> {
    let raw = path.as_ref().to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(&raw).as_ref());

    let contents = std::fs::read_to_string(&expanded).map_err(|source| BridgeError::ConfigRead {
        path: expanded.display().to_string(),
        source,
    })?;

    let config: BridgeConfig = serde_json::from_str(&contents)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration, falling back to defaults on any failure.
///
/// A missing file is expected and logged at info level; unreadable or
/// invalid files are logged as warnings.
#[instrument(name = "load_config", skip_all)]
pub fn load_config(path: Option<&Path>) -> BridgeConfig {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        info!("No config directory available, using defaults");
        return BridgeConfig::default();
    };

    match try_load_config(&path) {
        Ok(config) => {
            info!(path = %path.display(), "Successfully loaded config");
            config
        }
        Err(BridgeError::ConfigRead { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            info!(path = %path.display(), "Config file not found, using defaults");
            BridgeConfig::default()
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to load config, using defaults"
            );
            BridgeConfig::default()
        }
    }
}

fn validate(config: &BridgeConfig) -> Result<()> {
    if config.tabstops.linked_base == 0 {
        return Err(BridgeError::Config(
            "linkedBase must be greater than zero".to_string(),
        ));
    }
    if config.formatting.newline.is_empty() {
        return Err(BridgeError::Config("newline must not be empty".to_string()));
    }
    Ok(())
}
