//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over an optional path.  No path, or a path
//! that does not exist, means defaults.  Every field is optional in the
//! file; missing ones keep their default.  The result is validated before
//! it is returned.

use std::io::ErrorKind;
use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::RitualConfig;
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct JsonConfigFile {
    path: Option<PathBuf>,
}

impl JsonConfigFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Parse and validate config text.
    pub fn parse(text: &str) -> Result<RitualConfig, ConfigError> {
        let cfg: RitualConfig = serde_json::from_str(text).map_err(|e| {
            warn!("JsonConfigFile: parse error: {}", e);
            ConfigError::Corrupted
        })?;
        cfg.validate().map_err(|e| match e {
            Error::Config(msg) => ConfigError::ValidationFailed(msg),
            _ => ConfigError::ValidationFailed("invalid config"),
        })?;
        Ok(cfg)
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<RitualConfig, ConfigError> {
        let Some(path) = self.path.as_deref() else {
            info!("JsonConfigFile: no config file given, using defaults");
            return Ok(RitualConfig::default());
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let cfg = Self::parse(&text)?;
                info!("JsonConfigFile: loaded {}", path.display());
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("JsonConfigFile: {} not found, using defaults", path.display());
                Ok(RitualConfig::default())
            }
            Err(e) => {
                warn!("JsonConfigFile: cannot read {}: {}", path.display(), e);
                Err(ConfigError::IoError)
            }
        }
    }
}
