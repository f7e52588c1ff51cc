//! LDAP diagnostic error types.
//!
//! Error messages must not leak credentials; they carry parameter names
//! and server responses only.

use thiserror::Error;

/// Errors raised while materializing, loading or driving an LDAP
/// authentication configuration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The descriptor file is missing or does not parse.
    #[error("security descriptor error: {0}")]
    Descriptor(String),

    /// A required descriptor parameter is absent.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// The group search failed.
    #[error("LDAP group search failed: {0}")]
    Search(String),

    /// Underlying ldap3 error.
    #[error("LDAP error: {0}")]
    Ldap(#[from] ldap3::LdapError),

    /// Underlying IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    /// Creates a descriptor error.
    #[must_use]
    pub fn descriptor(msg: impl Into<String>) -> Self {
        Self::Descriptor(msg.into())
    }

    /// Creates a missing-parameter error.
    #[must_use]
    pub fn missing(param: impl Into<String>) -> Self {
        Self::MissingParameter(param.into())
    }
}

/// Result type for LDAP diagnostic operations.
pub type AuthResult<T> = Result<T, AuthError>;
