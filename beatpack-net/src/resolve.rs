// beatpack-net/src/resolve.rs
use beatpack_common::config::Config;
use beatpack_common::error::Result;
use beatpack_common::model::{Architecture, ArtifactFilter, ArtifactPackage};
use tracing::debug;

/// Builds the candidate package set for a target at a given version and
/// applies the caller-configured filter to it.
///
/// The version is threaded in explicitly by the caller; resolution never
/// reads the process environment. An empty result is not an error here, the
/// caller decides whether zero matches is fatal.
pub fn find_artifact(
    config: &Config,
    target: &str,
    version: &str,
    configure: impl FnOnce(&mut ArtifactFilter),
) -> Result<Vec<ArtifactPackage>> {
    let filter = ArtifactFilter::configured(target, configure)?;

    let canonical = target.to_ascii_lowercase();
    let version = version.trim_start_matches('v');
    let file_name = format!("{canonical}.exe");
    let url = format!(
        "{}/v{}/{}",
        config.release_base_url.trim_end_matches('/'),
        version,
        file_name
    );

    // Releases publish one binary per version; architecture narrows the
    // candidate set down through the filter.
    let candidates: Vec<ArtifactPackage> = [Architecture::X86, Architecture::X64]
        .into_iter()
        .map(|architecture| ArtifactPackage {
            target_name: target.to_string(),
            canonical_target_name: canonical.clone(),
            architecture,
            version: version.to_string(),
            url: Some(url.clone()),
            file_name: file_name.clone(),
        })
        .collect();

    let matched = filter.apply(&candidates);
    debug!(
        "Resolved {} of {} candidates for target '{}' version {}",
        matched.len(),
        candidates.len(),
        target,
        version
    );
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatpack_common::model::ConstraintKey;

    fn test_config() -> Config {
        Config {
            beatpack_root: std::path::PathBuf::from("/tmp/beatpack"),
            catalog_base_url: "https://artifacts.example.com/v1".to_string(),
            release_base_url: "https://releases.example.com/download".to_string(),
        }
    }

    #[test]
    fn resolves_release_url_from_version_and_canonical_name() {
        let matched = find_artifact(&test_config(), "LSBeat", "v1.2.3", |f| {
            f.set_constraint(ConstraintKey::Architecture, "x64");
        })
        .unwrap();

        assert_eq!(matched.len(), 1);
        let pkg = &matched[0];
        assert_eq!(pkg.canonical_target_name, "lsbeat");
        assert_eq!(pkg.version, "1.2.3");
        assert_eq!(pkg.file_name, "lsbeat.exe");
        assert_eq!(
            pkg.url.as_deref(),
            Some("https://releases.example.com/download/v1.2.3/lsbeat.exe")
        );
    }

    #[test]
    fn unconstrained_resolution_yields_both_architectures() {
        let matched = find_artifact(&test_config(), "lsbeat", "1.0.0", |_| {}).unwrap();
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn zero_matches_is_an_empty_result_not_an_error() {
        let matched = find_artifact(&test_config(), "lsbeat", "1.0.0", |f| {
            f.set_constraint(ConstraintKey::Platform, "linux");
        })
        .unwrap();
        assert!(matched.is_empty());
    }
}
