// # Handler Source Trait
//
// Defines the interface for looking up handler source code by stage and name.
//
// ## Implementations
//
// - Embedded catalog shipped with the crate: `BuiltinCatalog`
// - On-disk catalog laid out as `{root}/{stage}/{name}.js`: `DirectoryCatalog`
// - In-memory catalog for custom handler sets: `MemoryCatalog`
//
// ## Usage
//
// ```rust
// use infrakit_core::catalog::BuiltinCatalog;
// use infrakit_core::edge::Stage;
// use infrakit_core::traits::HandlerSource;
//
// let catalog = BuiltinCatalog::new();
// assert!(catalog.contains(Stage::ViewerRequest, "indexRewriteHandler"));
//
// let code = catalog.load(Stage::ViewerRequest, "indexRewriteHandler").unwrap();
// assert!(code.contains("function indexRewriteHandler"));
// ```

use crate::edge::Stage;

/// Trait for handler catalogs
///
/// Lookups are synchronous and side-effect-free apart from reading the
/// catalog's backing store. Implementations must be thread-safe so one
/// catalog can serve many compilations.
pub trait HandlerSource: Send + Sync {
    /// Load the source of a handler
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The handler source, placeholders not yet substituted
    /// - `Err(Error::HandlerNotFound)`: No entry for `{stage}/{name}`
    /// - `Err(Error::Io)`: The backing store could not be read
    fn load(&self, stage: Stage, name: &str) -> Result<String, crate::Error>;

    /// Check whether a handler exists without loading it
    ///
    /// The default implementation attempts a load.
    fn contains(&self, stage: Stage, name: &str) -> bool {
        self.load(stage, name).is_ok()
    }

    /// Get the catalog name (used for logging)
    fn name(&self) -> &'static str;
}
