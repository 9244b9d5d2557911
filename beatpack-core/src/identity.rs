// beatpack-core/src/identity.rs
use uuid::Uuid;

/// Namespace for product identity derivation. Fixed forever: the upgrade
/// code derived from a canonical name must never change between releases,
/// installer upgrade/downgrade detection depends on it.
const PRODUCT_NAMESPACE: Uuid = uuid::uuid!("93ce9a4b-3971-4e44-b6b2-6b6cb31ec9f5");

/// Derives the stable product/upgrade code for a canonical target name.
///
/// RFC 4122 version-5 UUID: SHA-1 over the namespace plus the name. Pure,
/// no I/O; the same name yields the same identity on every run and platform.
pub fn derive_identity(canonical_name: &str) -> Uuid {
    Uuid::new_v5(&PRODUCT_NAMESPACE, canonical_name.as_bytes())
}
