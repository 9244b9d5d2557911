// beatpack-net/src/validation.rs
use beatpack_common::error::{BeatpackError, Result};
use url::Url;

/// Rejects anything that is not a well-formed http(s) URL before a request
/// is ever built from it.
pub fn validate_url(url_str: &str) -> Result<()> {
    let parsed = Url::parse(url_str)
        .map_err(|e| BeatpackError::Validation(format!("Invalid URL '{url_str}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BeatpackError::Validation(format!(
            "Unsupported URL scheme '{other}' in '{url_str}'"
        ))),
    }
}
