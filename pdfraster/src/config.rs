//! Rasterizer configuration.
//!
//! Values come from an optional `pdfraster.{toml,json,yaml}` file in the working
//! directory, overridden by `PDFRASTER__*` environment variables.

mod loader;

use std::path::PathBuf;

use serde::Deserialize;

pub use loader::{load_config, load_config_from};

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RasterConfig {
    #[serde(default = "default_engine")]
    pub engine: EngineConfig,

    #[serde(default = "default_render")]
    pub render: RenderDefaults,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            render: default_render(),
        }
    }
}

/// PDFium binding configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Exact path to the PDFium shared library. Skips the directory search when set.
    #[serde(default)]
    pub library_path: Option<PathBuf>,

    /// Directories probed for the platform PDFium library, in order, before
    /// falling back to the system library path.
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        default_engine()
    }
}

/// Defaults for the command-line renderer
#[derive(Debug, Clone, Deserialize)]
pub struct RenderDefaults {
    #[serde(default = "default_target_width")]
    pub target_width: i32,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

// ==================== Default Value Functions ====================

pub(crate) fn default_engine() -> EngineConfig {
    EngineConfig {
        library_path: None,
        search_paths: default_search_paths(),
    }
}

pub(crate) fn default_search_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("./"), PathBuf::from("./vendor/pdfium/lib/")]
}

pub(crate) fn default_render() -> RenderDefaults {
    RenderDefaults {
        target_width: default_target_width(),
        output_dir: default_output_dir(),
    }
}

pub(crate) fn default_target_width() -> i32 {
    1200
}

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
