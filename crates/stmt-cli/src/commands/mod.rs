//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod parse;

use std::path::Path;

use tracing::debug;

use stmt_core::models::config::StmtConfig;

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StmtConfig> {
    if let Some(path) = config_path {
        return Ok(StmtConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration at {}", default_path.display());
        Ok(StmtConfig::from_file(&default_path)?)
    } else {
        Ok(StmtConfig::default())
    }
}
