// # Revision Source Trait
//
// Defines the interface for querying source-control history.
//
// ## Implementations
//
// - Git CLI: `GitRevisionSource` in `artifact::version`
//
// ## Usage
//
// ```rust,ignore
// use infrakit_core::artifact::{GitRevisionSource, compute_version};
//
// let source = GitRevisionSource::new(".");
// let version = compute_version(&source, &["frontend"]).await?;
// println!("frontend/{}", version);
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for source-control backends
#[async_trait]
pub trait RevisionSource: Send + Sync {
    /// Full hash of the last commit touching any of `paths`
    ///
    /// Paths are relative to [`RevisionSource::workdir`].
    ///
    /// # Returns
    ///
    /// - `Ok(Some(hash))`: The most recent commit
    /// - `Ok(None)`: None of the paths appear in the history
    /// - `Err(Error)`: The backend could not be queried
    async fn last_commit(&self, paths: &[PathBuf]) -> Result<Option<String>, crate::Error>;

    /// Working directory paths are resolved against
    fn workdir(&self) -> &Path;
}
