//! Secret management error types.
//!
//! Error messages must not leak secret material; they carry paths and
//! alias names only.

use thiserror::Error;

/// Errors raised by master secret, credential store and keystore
/// operations.
#[derive(Debug, Error)]
pub enum SecretsError {
    /// No master secret has been persisted yet.
    #[error("master secret is not present at {0}")]
    MasterMissing(String),

    /// The master secret file exists but cannot be read back.
    #[error("master secret file is corrupt: {0}")]
    MasterCorrupt(String),

    /// A sealed document failed to open, usually a wrong master secret.
    #[error("credential store could not be opened - the provided (or persisted) master secret may not match")]
    MasterMismatch,

    /// No credential store exists for the cluster.
    #[error("no credential store for cluster: {0}")]
    StoreMissing(String),

    /// The requested alias does not exist.
    #[error("alias not found: {0}")]
    AliasNotFound(String),

    /// Certificate or key generation failed.
    #[error("keystore error: {0}")]
    Keystore(String),

    /// Serialization failure inside a store document.
    #[error("store document error: {0}")]
    Document(#[from] serde_json::Error),

    /// Underlying IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SecretsError {
    /// Creates a keystore error.
    #[must_use]
    pub fn keystore(msg: impl Into<String>) -> Self {
        Self::Keystore(msg.into())
    }
}

/// Result type for secret management operations.
pub type SecretsResult<T> = Result<T, SecretsError>;
