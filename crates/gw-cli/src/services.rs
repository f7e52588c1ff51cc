//! Gateway service wiring.
//!
//! Commands reach every gateway subsystem through [`GatewayServices`].
//! Secret-backed services are built lazily per command so that a
//! missing or mismatched master secret surfaces as a service
//! lifecycle failure at the point of use, not at startup.

use zeroize::Zeroizing;

use gw_secrets::{AliasService, KeystoreService, MasterService};
use gw_topology::FileTopologyStore;

use crate::config::GatewayConfig;
use crate::error::CliResult;

/// The gateway subsystems a command can act on.
pub struct GatewayServices {
    config: GatewayConfig,
    topology: FileTopologyStore,
    master: MasterService,
    master_override: Option<String>,
}

impl GatewayServices {
    /// Wires the services for a resolved gateway layout.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let topology =
            FileTopologyStore::new(config.topologies_dir(), config.deployments_dir());
        let master = MasterService::new(config.security_dir());
        Self {
            config,
            topology,
            master,
            master_override: None,
        }
    }

    /// Sets a master secret that takes precedence over the persisted
    /// one for this invocation.
    pub fn set_master_override(&mut self, master: Option<String>) {
        self.master_override = master;
    }

    /// The resolved gateway layout.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Topology store, read-only.
    #[must_use]
    pub fn topology(&self) -> &FileTopologyStore {
        &self.topology
    }

    /// Topology store, for reload and redeploy.
    pub fn topology_mut(&mut self) -> &mut FileTopologyStore {
        &mut self.topology
    }

    /// Master secret persistence.
    #[must_use]
    pub fn master_service(&self) -> &MasterService {
        &self.master
    }

    /// The master secret in effect: the per-invocation override when
    /// set, the persisted secret otherwise.
    pub fn master_secret(&self) -> CliResult<Zeroizing<String>> {
        match &self.master_override {
            Some(master) => Ok(Zeroizing::new(master.clone())),
            None => Ok(self.master.read()?),
        }
    }

    /// Builds the credential alias service keyed off the effective
    /// master secret.
    pub fn alias_service(&self) -> CliResult<AliasService> {
        let master = self.master_secret()?;
        Ok(AliasService::new(self.config.security_dir(), &master))
    }

    /// Builds the identity keystore service.
    #[must_use]
    pub fn keystore_service(&self) -> KeystoreService {
        KeystoreService::new(self.config.security_dir())
    }
}
