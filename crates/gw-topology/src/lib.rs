//! # gw-topology
//!
//! Topology model and file-backed topology store for the gateway CLI.
//!
//! A topology is a named cluster configuration: an ordered set of
//! providers, each a parameterized plugin role (authentication,
//! authorization, ...). Topologies are read from TOML descriptors in
//! the gateway's `conf/topologies` directory.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod store;
pub mod topology;
pub mod validation;

pub use error::{TopologyError, TopologyResult};
pub use store::{FileTopologyStore, TopologyService};
pub use topology::{Provider, Topology};
