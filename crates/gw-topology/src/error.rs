//! Topology error types.

use thiserror::Error;

/// Errors raised by topology loading, lookup and deployment.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The topologies directory is missing or unreadable.
    #[error("topologies directory not available: {0}")]
    DirectoryUnavailable(String),

    /// A topology descriptor failed to parse.
    #[error("invalid topology descriptor {name}: {message}")]
    InvalidDescriptor {
        /// Descriptor file stem.
        name: String,
        /// Parse failure detail.
        message: String,
    },

    /// No topology with the given name is loaded.
    #[error("topology not found: {0}")]
    NotFound(String),

    /// Deployment artifact generation failed.
    #[error("deployment failed for {name}: {message}")]
    Deployment {
        /// Topology name.
        name: String,
        /// Failure detail.
        message: String,
    },

    /// Underlying IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TopologyError {
    /// Creates an invalid-descriptor error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a deployment error.
    #[must_use]
    pub fn deployment(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deployment {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;
