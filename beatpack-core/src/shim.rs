// beatpack-core/src/shim.rs
use std::fs;
use std::path::{Path, PathBuf};

use beatpack_common::error::Result;
use tracing::debug;

// Forwards every argument to the versioned executable that lives next to
// the script, so the product is callable without touching the service.
const GENERIC_CLI_SHIM: &str = r#"# Generated by beatpack. Do not edit.
$exe = Join-Path $PSScriptRoot "{name}\{name}.exe"
& $exe @args
exit $LASTEXITCODE
"#;

/// Drops the generic CLI shim for a product into `out_dir` and returns its
/// path, ready to be referenced from the package tree.
pub fn write_cli_shim(out_dir: &Path, canonical_name: &str) -> Result<PathBuf> {
    let path = out_dir.join(format!("{canonical_name}.ps1"));
    let body = GENERIC_CLI_SHIM.replace("{name}", canonical_name);
    fs::write(&path, body)?;
    debug!("Wrote CLI shim: {}", path.display());
    Ok(path)
}
