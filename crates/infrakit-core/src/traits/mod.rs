//! Core traits for infrakit
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`HandlerSource`]: Look up edge handler source code
//! - [`RevisionSource`]: Find the last commit touching a set of paths

pub mod handler_source;
pub mod revision_source;

pub use handler_source::HandlerSource;
pub use revision_source::RevisionSource;
