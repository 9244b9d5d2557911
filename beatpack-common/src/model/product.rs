// beatpack-common/src/model/product.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{BeatpackError, Result};

/// Per-product build settings, read from the build configuration file and
/// read-only from there on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductConfig {
    #[serde(default)]
    pub description: String,

    /// Installed as a background OS service rather than a user-invoked tool.
    #[serde(default)]
    pub is_windows_service: bool,

    /// Staged subdirectories whose contents change at runtime (config, data,
    /// logs). Provisioned separately, never baked into the install tree.
    #[serde(default)]
    pub mutable_dirs: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfiguration {
    #[serde(default)]
    products: BTreeMap<String, ProductConfig>,
}

impl BuildConfiguration {
    pub fn read(path: &Path) -> Result<Self> {
        debug!("Reading build configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| {
            BeatpackError::Config(format!(
                "Failed to read build configuration {}: {e}",
                path.display()
            ))
        })?;
        let config: BuildConfiguration = serde_yaml_ng::from_str(&text)?;
        debug!("Parsed {} product entries", config.products.len());
        Ok(config)
    }

    pub fn product(&self, name: &str) -> Result<&ProductConfig> {
        self.products.get(name).ok_or_else(|| {
            BeatpackError::NotFound(format!("No product configuration for '{name}'"))
        })
    }
}
