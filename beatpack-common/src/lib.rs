// beatpack-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;

// Re-export key types
pub use config::Config;
pub use error::{BeatpackError, Result};
pub use model::{
    Architecture, ArtifactContainer, ArtifactFilter, ArtifactPackage, BuildConfiguration,
    ConstraintKey, ContainerKind, FetchResult, ProductConfig,
};
