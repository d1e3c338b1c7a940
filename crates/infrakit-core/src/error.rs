//! Error types for infrakit
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for infrakit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for infrakit
#[derive(Error, Debug)]
pub enum Error {
    /// The parent block has a prefix length the allocator cannot split
    #[error("Unsupported prefix length /{0}: only /56 parent blocks can be split into /64 subnets")]
    UnsupportedPrefixLength(u8),

    /// The subnet index does not fit into the subnet field
    #[error("Subnet index {index} out of range (max {max})")]
    SubnetIndexOutOfRange {
        /// Requested index
        index: u32,
        /// Largest accepted index
        max: u32,
    },

    /// Malformed CIDR text
    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    /// IPv4 subnet mask bits outside the supported range
    #[error("Unsupported IPv4 mask bits /{0} (must be 20-24)")]
    UnsupportedMaskBits(u8),

    /// No catalog entry for a handler referenced by name
    #[error("Handler not found: {stage}/{name}")]
    HandlerNotFound {
        /// Pipeline stage the handler was looked up under
        stage: String,
        /// Handler name
        name: String,
    },

    /// The chain was already built and is immutable
    #[error("Handler chain '{0}' was already built")]
    AlreadyBuilt(String),

    /// Handler name or definition rejected
    #[error("Invalid handler: {0}")]
    InvalidHandler(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A path given for versioning does not exist
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// No commit touches the given paths
    #[error("Paths {0} not found in history")]
    NotInHistory(String),

    /// An external command failed
    #[error("Command failed: {0}")]
    Command(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a "handler not found" error
    pub fn handler_not_found(stage: impl Into<String>, name: impl Into<String>) -> Self {
        Self::HandlerNotFound {
            stage: stage.into(),
            name: name.into(),
        }
    }

    /// Create an "already built" error
    pub fn already_built(chain: impl Into<String>) -> Self {
        Self::AlreadyBuilt(chain.into())
    }

    /// Create an invalid handler error
    pub fn invalid_handler(msg: impl Into<String>) -> Self {
        Self::InvalidHandler(msg.into())
    }

    /// Create an invalid CIDR error
    pub fn invalid_cidr(msg: impl Into<String>) -> Self {
        Self::InvalidCidr(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
