// # Handler Catalogs
//
// This module provides implementations of the HandlerSource trait for
// different places handler code can live.

pub mod builtin;
pub mod directory;
pub mod memory;

pub use builtin::BuiltinCatalog;
pub use directory::DirectoryCatalog;
pub use memory::MemoryCatalog;
