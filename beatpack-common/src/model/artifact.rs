// beatpack-common/src/model/artifact.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BeatpackError, Result};

/// The kind of named grouping an artifact is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Branch,
    Version,
    Alias,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerKind::Branch => "branch",
            ContainerKind::Version => "version",
            ContainerKind::Alias => "alias",
        };
        f.write_str(s)
    }
}

/// One entry of the remote catalog listing. Immutable once listed; the same
/// name may legitimately appear under more than one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactContainer {
    pub name: String,
    pub kind: ContainerKind,
}

impl ArtifactContainer {
    pub fn new(name: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    pub fn is_64bit(self) -> bool {
        matches!(self, Architecture::X64)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86 => f.write_str("x86"),
            Architecture::X64 => f.write_str("x64"),
        }
    }
}

impl FromStr for Architecture {
    type Err = BeatpackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x86" => Ok(Architecture::X86),
            "x64" => Ok(Architecture::X64),
            other => Err(BeatpackError::Validation(format!(
                "Unknown architecture '{other}' (expected x86 or x64)"
            ))),
        }
    }
}

/// A concrete downloadable build output, produced by resolution and consumed
/// exactly once by the fetch engine. Carries no mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPackage {
    pub target_name: String,
    pub canonical_target_name: String,
    pub architecture: Architecture,
    pub version: String,
    /// Absent means "not downloadable": a fetch attempt fails fast instead
    /// of making a request.
    pub url: Option<String>,
    pub file_name: String,
}

impl ArtifactPackage {
    pub fn is_downloadable(&self) -> bool {
        self.url.is_some()
    }

    pub fn semver(&self) -> Result<semver::Version> {
        Ok(semver::Version::parse(self.version.trim_start_matches('v'))?)
    }
}

impl fmt::Display for ArtifactPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.target_name, self.version, self.architecture
        )
    }
}

/// Outcome of one fetch-engine invocation. Returned, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub was_already_present: bool,
    pub local_path: PathBuf,
}
