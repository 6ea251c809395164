use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_logging::catalog_info;
use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the working directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "catalog.ron";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "CATALOG_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Origin of the catalog API, e.g. `http://localhost:3001`.
    pub base_url: String,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Serve the seeded in-memory store instead of calling `base_url`.
    pub offline: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            page_size: 20,
            debounce_ms: 600,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            offline: false,
        }
    }
}

impl CatalogSettings {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("page_size must be at least 1")]
    InvalidPageSize,
}

/// Loads settings from `path`; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<CatalogSettings, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CatalogSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let settings: CatalogSettings =
        ron::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if settings.page_size == 0 {
        return Err(SettingsError::InvalidPageSize);
    }

    catalog_info!("Loaded settings from {:?}", path);
    Ok(settings)
}
