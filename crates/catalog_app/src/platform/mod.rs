//! Terminal host for the catalog: wires stdin, the engine and the renderer
//! around the pure core state machine.
mod app;
mod effects;
mod input;
mod ui;

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use catalog_engine::{load_settings, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use catalog_logging::{catalog_info, LogDestination};
use log::LevelFilter;

/// Command-line switch that forces the in-memory demo store.
const OFFLINE_FLAG: &str = "--offline";

pub fn run() -> anyhow::Result<()> {
    catalog_logging::initialize(LogDestination::default(), LevelFilter::Info);

    let config_path = env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut settings = load_settings(&config_path)
        .with_context(|| format!("loading settings from {}", config_path.display()))?;
    if env::args().skip(1).any(|arg| arg == OFFLINE_FLAG) {
        settings.offline = true;
    }
    if settings.offline {
        catalog_info!("Using the built-in demo store");
    } else {
        catalog_info!("Using catalog API at {}", settings.base_url);
    }

    app::run_app(&settings)
}
