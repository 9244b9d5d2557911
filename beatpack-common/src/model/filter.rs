// beatpack-common/src/model/filter.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::artifact::{ArtifactContainer, ArtifactPackage};
use crate::error::{BeatpackError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKey {
    Platform,
    Architecture,
    Kind,
}

/// Target constraints used to narrow a candidate set down to one package.
///
/// Built with a mandatory target name; callers may narrow it further through
/// a configuration closure before it is used for matching. Matching is total
/// and deterministic: the same filter over the same candidates always
/// selects the same subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFilter {
    target_name: String,
    constraints: BTreeMap<ConstraintKey, String>,
}

impl ArtifactFilter {
    pub fn new(target_name: impl Into<String>) -> Result<Self> {
        let target_name = target_name.into();
        if target_name.is_empty() {
            return Err(BeatpackError::Validation(
                "Artifact filter requires a non-empty target name".to_string(),
            ));
        }
        Ok(Self {
            target_name,
            constraints: BTreeMap::new(),
        })
    }

    /// Construct and run the caller's configuration step in one go.
    pub fn configured(
        target_name: impl Into<String>,
        configure: impl FnOnce(&mut ArtifactFilter),
    ) -> Result<Self> {
        let mut filter = Self::new(target_name)?;
        configure(&mut filter);
        Ok(filter)
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn set_constraint(&mut self, key: ConstraintKey, value: impl Into<String>) -> &mut Self {
        self.constraints.insert(key, value.into());
        self
    }

    pub fn constraint(&self, key: ConstraintKey) -> Option<&str> {
        self.constraints.get(&key).map(String::as_str)
    }

    pub fn matches(&self, candidate: &ArtifactPackage) -> bool {
        if !candidate
            .target_name
            .eq_ignore_ascii_case(&self.target_name)
        {
            return false;
        }
        self.constraints.iter().all(|(key, want)| match key {
            ConstraintKey::Architecture => candidate
                .architecture
                .to_string()
                .eq_ignore_ascii_case(want),
            // Platform shows up in the published file name (and URL), not as
            // a dedicated field on the package.
            ConstraintKey::Platform => {
                let want = want.to_ascii_lowercase();
                candidate.file_name.to_ascii_lowercase().contains(&want)
                    || candidate
                        .url
                        .as_deref()
                        .is_some_and(|u| u.to_ascii_lowercase().contains(&want))
            }
            // Kind only distinguishes catalog containers.
            ConstraintKey::Kind => true,
        })
    }

    pub fn matches_container(&self, container: &ArtifactContainer) -> bool {
        match self.constraints.get(&ConstraintKey::Kind) {
            Some(want) => container.kind.to_string().eq_ignore_ascii_case(want),
            None => true,
        }
    }

    /// Selects the matching subset, preserving candidate order.
    pub fn apply(&self, candidates: &[ArtifactPackage]) -> Vec<ArtifactPackage> {
        candidates
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }
}
