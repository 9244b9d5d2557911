use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BeatpackError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("YAML Parsing Error: {0}")]
    Yaml(#[from] Arc<serde_yaml_ng::Error>),

    #[error("Semantic Versioning Error: {0}")]
    SemVer(#[from] Arc<semver::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Transport Error: {0}")]
    Transport(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    Download(String, String, String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("Validation Error: {0}")]
    Validation(String),
}

impl From<std::io::Error> for BeatpackError {
    fn from(err: std::io::Error) -> Self {
        BeatpackError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for BeatpackError {
    fn from(err: reqwest::Error) -> Self {
        BeatpackError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for BeatpackError {
    fn from(err: serde_json::Error) -> Self {
        BeatpackError::Json(Arc::new(err))
    }
}

impl From<serde_yaml_ng::Error> for BeatpackError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        BeatpackError::Yaml(Arc::new(err))
    }
}

impl From<semver::Error> for BeatpackError {
    fn from(err: semver::Error) -> Self {
        BeatpackError::SemVer(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BeatpackError>;
