// src/model/mod.rs
// Declares the modules within the model directory.

pub mod artifact;
pub mod filter;
pub mod product;

// Re-export
pub use artifact::{Architecture, ArtifactContainer, ArtifactPackage, ContainerKind, FetchResult};
pub use filter::{ArtifactFilter, ConstraintKey};
pub use product::{BuildConfiguration, ProductConfig};
