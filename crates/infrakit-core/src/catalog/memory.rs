// # Memory Catalog
//
// In-memory implementation of HandlerSource.
//
// Useful for tests and for applications that generate handler code at
// runtime instead of shipping it as files.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::edge::Stage;
use crate::error::{Error, Result};
use crate::traits::HandlerSource;

/// In-memory handler catalog
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<RwLock<HashMap<(Stage, String), String>>>,
}

impl MemoryCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a handler
    pub fn insert(&self, stage: Stage, name: impl Into<String>, code: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.insert((stage, name.into()), code.into());
    }

    /// Remove a handler
    pub fn remove(&self, stage: Stage, name: &str) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.remove(&(stage, name.to_string()));
    }

    /// Get the number of handlers in the catalog
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HandlerSource for MemoryCatalog {
    fn load(&self, stage: Stage, name: &str) -> Result<String> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&(stage, name.to_string()))
            .cloned()
            .ok_or_else(|| Error::handler_not_found(stage.as_str(), name))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
