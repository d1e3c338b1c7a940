// # Built-in Catalog
//
// Handler sources compiled into the crate from `resources/edge-handlers`.
//
// ## Layout
//
// ```text
// resources/edge-handlers/
// ├── viewer-request/
// │   ├── basicAuthHandler.js
// │   └── indexRewriteHandler.js
// └── viewer-response/
//     ├── cacheControlHandler.js
//     └── securityHeadersHandler.js
// ```

use crate::edge::Stage;
use crate::error::{Error, Result};
use crate::traits::HandlerSource;

/// Embedded handler sources, keyed by stage and name
const ENTRIES: &[(Stage, &str, &str)] = &[
    (
        Stage::ViewerRequest,
        "basicAuthHandler",
        include_str!("../../resources/edge-handlers/viewer-request/basicAuthHandler.js"),
    ),
    (
        Stage::ViewerRequest,
        "indexRewriteHandler",
        include_str!("../../resources/edge-handlers/viewer-request/indexRewriteHandler.js"),
    ),
    (
        Stage::ViewerResponse,
        "cacheControlHandler",
        include_str!("../../resources/edge-handlers/viewer-response/cacheControlHandler.js"),
    ),
    (
        Stage::ViewerResponse,
        "securityHeadersHandler",
        include_str!("../../resources/edge-handlers/viewer-response/securityHeadersHandler.js"),
    ),
];

/// Catalog of the handlers shipped with infrakit
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    /// Create the built-in catalog
    pub fn new() -> Self {
        Self
    }

    /// List the handler names available for a stage
    pub fn list(&self, stage: Stage) -> Vec<&'static str> {
        ENTRIES
            .iter()
            .filter(|(entry_stage, _, _)| *entry_stage == stage)
            .map(|(_, name, _)| *name)
            .collect()
    }
}

impl HandlerSource for BuiltinCatalog {
    fn load(&self, stage: Stage, name: &str) -> Result<String> {
        ENTRIES
            .iter()
            .find(|(entry_stage, entry_name, _)| *entry_stage == stage && *entry_name == name)
            .map(|(_, _, code)| (*code).to_string())
            .ok_or_else(|| Error::handler_not_found(stage.as_str(), name))
    }

    fn name(&self) -> &'static str {
        "builtin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_defines_its_function() {
        for (stage, name, code) in ENTRIES {
            let signature = format!("function {}({})", name, stage.object_field());
            assert!(code.contains(&signature), "{stage}/{name} lacks `{signature}`");
        }
    }

    #[test]
    fn test_lookup_is_stage_scoped() {
        let catalog = BuiltinCatalog::new();
        assert!(catalog.contains(Stage::ViewerRequest, "basicAuthHandler"));
        assert!(!catalog.contains(Stage::ViewerResponse, "basicAuthHandler"));

        let err = catalog.load(Stage::ViewerResponse, "basicAuthHandler").unwrap_err();
        assert!(matches!(err, Error::HandlerNotFound { .. }));
    }

    #[test]
    fn test_list() {
        let catalog = BuiltinCatalog::new();
        assert_eq!(
            catalog.list(Stage::ViewerRequest),
            ["basicAuthHandler", "indexRewriteHandler"]
        );
        assert_eq!(
            catalog.list(Stage::ViewerResponse),
            ["cacheControlHandler", "securityHeadersHandler"]
        );
    }
}
