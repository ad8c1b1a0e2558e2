//! Command implementations for the vqaprep CLI.

mod profile;
mod run;

pub use profile::cmd_profile;
pub use run::cmd_run;

use anyhow::Result;
use tracing::{debug, info, warn};
use vqaprep_core::{load_config, ConfigHandle, DataDirs};

/// Resolve the data directory and load the config, logging where it came from.
fn load_settings(config_path: Option<&std::path::Path>) -> Result<(DataDirs, ConfigHandle)> {
    let dirs = DataDirs::from_env();
    debug!("Data directory: {}", dirs.base().display());

    let handle = load_config(config_path, &dirs)?;
    for warning in &handle.warnings {
        warn!("{}", warning);
    }
    match &handle.source {
        Some(source) => info!("Loaded config from {}", source.display()),
        None => debug!("No config file found; using built-in defaults"),
    }
    Ok((dirs, handle))
}
