//! Subcommands of the `invex` binary.

pub mod app;
pub mod batch;
pub mod config;
pub mod inspect;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use invex_core::{InvexConfig, LabelInvoiceExtractor};

/// Location of the configuration file when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invex")
        .join("config.json")
}

/// The file `--config` points at, or the default location.
pub fn config_file(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration.
///
/// An explicit path must exist; the default location is optional and
/// falls back to built-in defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<InvexConfig> {
    if let Some(path) = explicit {
        return InvexConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config {}", path.display());
        InvexConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        Ok(InvexConfig::default())
    }
}

/// Build the label extractor for a configuration.
pub fn build_extractor(config: InvexConfig) -> anyhow::Result<Arc<LabelInvoiceExtractor>> {
    let extractor = LabelInvoiceExtractor::new(config).context("Invalid field configuration")?;
    Ok(Arc::new(extractor))
}
