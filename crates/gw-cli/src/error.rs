//! CLI error types.

use gw_auth_ldap::AuthError;
use gw_secrets::SecretsError;
use gw_topology::TopologyError;
use thiserror::Error;

/// Errors surfaced by command execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// A required gateway service could not be brought up, usually
    /// because the master secret is missing or does not match.
    #[error("service initialization failed: {0}")]
    ServiceLifecycle(String),

    /// The command was invoked with arguments that cannot be acted on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Topology store failure.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// Authentication diagnostic failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Secret management failure.
    #[error("secret store error: {0}")]
    Secrets(SecretsError),

    /// Configuration file failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Creates a service lifecycle error.
    #[must_use]
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::ServiceLifecycle(msg.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<SecretsError> for CliError {
    fn from(e: SecretsError) -> Self {
        match e {
            // A missing or mismatched master means no secret-backed
            // service can start at all.
            SecretsError::MasterMissing(_)
            | SecretsError::MasterCorrupt(_)
            | SecretsError::MasterMismatch => Self::ServiceLifecycle(e.to_string()),
            other => Self::Secrets(other),
        }
    }
}

/// Result type for command execution.
pub type CliResult<T> = Result<T, CliError>;
