// beatpack-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::Result;

pub const COMPANY_NAME: &str = "Elastic";
pub const PRODUCT_SET_NAME: &str = "Beats";

const BEATPACK_ROOT_ENV: &str = "BEATPACK_ROOT";
const DEFAULT_ROOT_DIR_NAME: &str = "build";

const DEFAULT_CATALOG_BASE_URL: &str = "https://artifacts-api.elastic.co/v1";
const DEFAULT_RELEASE_BASE_URL: &str =
    "https://github.com/seungyongshim/lsbeat/releases/download";

/// Process-wide working configuration. The environment is read here and
/// nowhere else; everything downstream takes this struct as a plain value.
#[derive(Debug, Clone)]
pub struct Config {
    pub beatpack_root: PathBuf,
    pub catalog_base_url: String,
    pub release_base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading beatpack configuration");

        let beatpack_root = match env::var(BEATPACK_ROOT_ENV).ok().filter(|s| !s.is_empty()) {
            Some(root) => PathBuf::from(root),
            None => {
                let cwd = env::current_dir()?;
                debug!(
                    "{} not set, falling back to {}/{}",
                    BEATPACK_ROOT_ENV,
                    cwd.display(),
                    DEFAULT_ROOT_DIR_NAME
                );
                cwd.join(DEFAULT_ROOT_DIR_NAME)
            }
        };
        debug!("Effective beatpack root: {}", beatpack_root.display());

        Ok(Self {
            beatpack_root,
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
        })
    }

    pub fn beatpack_root(&self) -> &Path {
        &self.beatpack_root
    }

    /// Where fetched artifacts land, one subdirectory per artifact.
    pub fn in_dir(&self) -> PathBuf {
        self.beatpack_root.join("in")
    }

    /// Where the assembled tree model and generated files go.
    pub fn out_dir(&self) -> PathBuf {
        self.beatpack_root.join("out")
    }

    /// Externally populated extra files (mutable configuration, modules).
    pub fn extra_dir(&self) -> PathBuf {
        self.beatpack_root.join("extra")
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.beatpack_root.join("resources")
    }

    /// Staged-files root for one product, as laid out by the fetch step.
    pub fn staged_package_dir(&self, canonical_name: &str) -> PathBuf {
        self.in_dir().join(canonical_name)
    }
}
