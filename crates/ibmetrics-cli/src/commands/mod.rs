//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod inspect;
pub mod process;
pub mod scan;

use std::path::Path;

use ibmetrics_core::IbmConfig;

/// Load the configuration from `path`, or the defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<IbmConfig> {
    match path {
        Some(path) => Ok(IbmConfig::from_file(Path::new(path))?),
        None => Ok(IbmConfig::default()),
    }
}
