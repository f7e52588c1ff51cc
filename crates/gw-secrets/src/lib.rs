//! # gw-secrets
//!
//! Local secret management for the gateway CLI: the master secret file,
//! per-cluster encrypted credential stores (aliases), and the gateway
//! identity keystore with self-signed certificate support.
//!
//! All stored secrets are protected by the master secret; credential
//! store documents are sealed with AES-256-GCM under a key derived from
//! it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod keystore;
pub mod master;
mod seal;
pub mod store;

pub use error::{SecretsError, SecretsResult};
pub use keystore::KeystoreService;
pub use master::MasterService;
pub use store::AliasService;
