// beatpack-core/src/lib.rs
pub mod identity;
pub mod policy;
pub mod shim;
pub mod tree;

// Re-export key types
pub use identity::derive_identity;
pub use policy::{ExclusionPolicy, ExclusionRule, RuleMatcher};
pub use shim::write_cli_shim;
pub use tree::{
    assemble, AssembleInputs, DirNode, FileNode, MajorUpgradePolicy, PackageTree,
    ServiceDescriptor, ServiceEvent, StartMode,
};
