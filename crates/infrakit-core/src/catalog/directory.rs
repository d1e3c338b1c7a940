// # Directory Catalog
//
// Loads handler sources from disk, one file per handler:
// `{root}/{stage}/{name}.js`.
//
// Each lookup is a single file read; nothing is cached, so edits to the
// directory are picked up by the next compilation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::edge::Stage;
use crate::edge::handler::validate_identifier;
use crate::error::{Error, Result};
use crate::traits::HandlerSource;

/// File extension of handler sources
const HANDLER_EXTENSION: &str = "js";

/// Catalog backed by a directory tree
///
/// # Example
///
/// ```rust,no_run
/// use infrakit_core::catalog::DirectoryCatalog;
/// use infrakit_core::edge::Stage;
/// use infrakit_core::traits::HandlerSource;
///
/// let catalog = DirectoryCatalog::new("/etc/infrakit/handlers");
/// let code = catalog.load(Stage::ViewerRequest, "geoRedirectHandler").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    /// Create a catalog rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the catalog root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a handler is expected at
    pub fn handler_path(&self, stage: Stage, name: &str) -> PathBuf {
        self.root
            .join(stage.as_str())
            .join(format!("{}.{}", name, HANDLER_EXTENSION))
    }
}

impl HandlerSource for DirectoryCatalog {
    fn load(&self, stage: Stage, name: &str) -> Result<String> {
        // Names are joined into a path; identifiers cannot escape the root
        if validate_identifier(name).is_err() {
            return Err(Error::handler_not_found(stage.as_str(), name));
        }

        let path = self.handler_path(stage, name);
        debug!(path = %path.display(), "loading handler source");

        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::handler_not_found(stage.as_str(), name),
            _ => Error::Io(e),
        })
    }

    fn contains(&self, stage: Stage, name: &str) -> bool {
        validate_identifier(name).is_ok() && self.handler_path(stage, name).is_file()
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}
