//! Artifact versions derived from source-control history
//!
//! A version is the 8-character prefix of the last commit that touched any
//! of the artifact's source paths. Unchanged sources keep their version, so
//! artifacts built from them can be treated as immutable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::RevisionSource;

/// Number of commit hash characters kept in a version
pub const VERSION_LENGTH: usize = 8;

/// Truncated commit hash identifying an artifact build
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactVersion(String);

impl ArtifactVersion {
    /// Create a version from a full or truncated commit hash
    pub fn from_commit(commit: &str) -> Result<Self> {
        let commit = commit.trim();
        if commit.len() < VERSION_LENGTH || !commit.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_input(format!(
                "'{}' is not a commit hash",
                commit
            )));
        }

        Ok(Self(commit[..VERSION_LENGTH].to_string()))
    }

    /// Get the version string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Revision source backed by the `git` CLI
///
/// Runs `git log -n 1 --pretty=format:%H -- <paths>` inside the working
/// directory. Paths are passed as separate arguments, never through a shell.
#[derive(Debug, Clone)]
pub struct GitRevisionSource {
    workdir: PathBuf,
    git: PathBuf,
}

impl GitRevisionSource {
    /// Create a source for the repository containing `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            git: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable
    pub fn with_git_binary(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = git.into();
        self
    }
}

#[async_trait]
impl RevisionSource for GitRevisionSource {
    async fn last_commit(&self, paths: &[PathBuf]) -> Result<Option<String>> {
        let output = Command::new(&self.git)
            .current_dir(&self.workdir)
            .args(["log", "-n", "1", "--pretty=format:%H", "--"])
            .args(paths)
            .output()
            .await
            .map_err(|e| Error::command(format!("failed to run {}: {}", self.git.display(), e)))?;

        if !output.status.success() {
            return Err(Error::command(format!(
                "git log exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let commit = stdout.trim();
        Ok((!commit.is_empty()).then(|| commit.to_string()))
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }
}

/// Compute the version of the sources under `paths`
///
/// # Errors
///
/// - [`Error::InvalidInput`]: no paths given
/// - [`Error::PathNotFound`]: a path does not exist below the working directory
/// - [`Error::NotInHistory`]: no commit touches any of the paths
pub async fn compute_version<P: AsRef<Path>>(
    source: &dyn RevisionSource,
    paths: &[P],
) -> Result<ArtifactVersion> {
    if paths.is_empty() {
        return Err(Error::invalid_input("At least one path is required"));
    }

    let mut resolved = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        if tokio::fs::metadata(source.workdir().join(path)).await.is_err() {
            return Err(Error::PathNotFound(path.display().to_string()));
        }
        resolved.push(path.to_path_buf());
    }

    let listed = resolved
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(" ");

    let commit = source
        .last_commit(&resolved)
        .await?
        .ok_or_else(|| Error::NotInHistory(listed.clone()))?;

    let version = ArtifactVersion::from_commit(&commit)?;
    debug!(paths = %listed, %version, "computed artifact version");

    Ok(version)
}
