//! Subcommands.

pub mod batch;
pub mod config;
pub mod confirm;
pub mod extract;
pub mod scan;

use std::path::{Path, PathBuf};

use resit_core::models::config::ResitConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resit")
        .join("config.json")
}

/// Load the configuration named on the command line, else the default file
/// when it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ResitConfig> {
    if let Some(path) = config_path {
        return Ok(ResitConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(ResitConfig::from_file(&path)?)
    } else {
        Ok(ResitConfig::default())
    }
}
