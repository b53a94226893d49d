//! Configuration validation
//!
//! Checks that need the filesystem or the runtime, on top of [`Config::validate`].

use anyhow::{anyhow, Result};
use mediagate_core::Config;
use std::path::Path;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if let Some(dir) = config.scratch_dir() {
        if !Path::new(dir).is_dir() {
            return Err(anyhow!("SCRATCH_DIR {} is not an existing directory", dir));
        }
    }

    if !config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS allows all origins; set CORS_ORIGINS before deploying");
    }

    Ok(())
}
