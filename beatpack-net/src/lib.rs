// beatpack-net/src/lib.rs
pub mod catalog;
pub mod fetch;
pub mod resolve;
pub mod validation;

// Re-export the public fetching functions
pub use catalog::list_named_containers;
pub use fetch::fetch_artifact;
pub use resolve::find_artifact;
pub use validation::validate_url;
