//! Configuration loading from files and environment variables.

use std::path::Path;

use config::{Config, Environment, File};

use super::RasterConfig;
use crate::error::{RasterError, RasterResult};

const ENV_PREFIX: &str = "PDFRASTER";

/// Load configuration from `pdfraster.*` in the working directory and env vars
pub fn load_config() -> RasterResult<RasterConfig> {
    build(File::with_name("pdfraster").required(false))
}

/// Load configuration from an explicit file, still applying env var overrides
pub fn load_config_from(path: &Path) -> RasterResult<RasterConfig> {
    build(File::from(path).required(true))
}

fn build<S>(file: S) -> RasterResult<RasterConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| RasterError::Config {
            message: format!("Failed to build config: {}", e),
        })?
        .try_deserialize()
        .map_err(|e| RasterError::Config {
            message: format!("Failed to deserialize config: {}", e),
        })
}
