//! # gw-auth-ldap
//!
//! LDAP authentication diagnostics for the gateway CLI.
//!
//! Provides the three pieces the `auth-test` workflow chains together:
//! materialization of a topology's authentication provider into a
//! security descriptor ([`descriptor`]), a bind driver bootstrapped
//! from that descriptor ([`authenticator`]), and the group-lookup
//! parameter completeness checker ([`checker`]).
//!
//! Passwords are never logged.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod checker;
pub mod descriptor;
pub mod error;

pub use authenticator::{AuthOutcome, LdapAuthConfig, LdapAuthenticator};
pub use descriptor::{SecurityDescriptor, SUPPORTED_PROVIDER_NAME, SUPPORTED_PROVIDER_ROLE};
pub use error::{AuthError, AuthResult};
