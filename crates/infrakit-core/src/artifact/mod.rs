//! Build artifacts
//!
//! An artifact is a directory of build output (static site assets, a zipped
//! function bundle) identified by a name and a version, e.g.
//! `frontend/b5461773`.

pub mod build;
pub mod version;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

pub use build::run_build_command;
pub use version::{ArtifactVersion, GitRevisionSource, VERSION_LENGTH, compute_version};

/// A named, versioned artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    name: String,
    version: ArtifactVersion,
}

impl Artifact {
    /// Create an artifact reference
    ///
    /// The name becomes a path segment and must not contain `/`.
    pub fn new(name: impl Into<String>, version: ArtifactVersion) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(Error::invalid_input(format!(
                "Artifact name '{}' must be a non-empty path segment",
                name
            )));
        }

        Ok(Self { name, version })
    }

    /// Artifact name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Artifact version
    pub fn version(&self) -> &ArtifactVersion {
        &self.version
    }

    /// Location inside the artifact store, without leading or trailing slash
    pub fn path(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
