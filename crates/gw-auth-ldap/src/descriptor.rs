//! Security descriptor materialization.
//!
//! The auth-test workflow does not read the topology directly: it
//! expands the topology's authentication provider into a standalone
//! key/value descriptor inside a fresh temporary deployment tree, the
//! same artifact a gateway deployment would carry, and bootstraps the
//! authenticator from that file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gw_topology::Topology;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Provider role the diagnostic supports.
pub const SUPPORTED_PROVIDER_ROLE: &str = "authentication";

/// Provider name the diagnostic supports.
pub const SUPPORTED_PROVIDER_NAME: &str = "LdapProvider";

/// Descriptor location inside an exploded deployment tree.
pub const DESCRIPTOR_RELATIVE_PATH: &str = "conf/ldap-auth.toml";

// Parameter keys carried from the topology provider into the
// descriptor. The names are the provider's own parameter vocabulary.
/// Realm class parameter.
pub const P_REALM: &str = "main.ldapRealm";
/// Group context factory parameter.
pub const P_GROUP_CONTEXT_FACTORY: &str = "main.ldapGroupContextFactory";
/// Group search base parameter.
pub const P_SEARCH_BASE: &str = "main.ldapRealm.searchBase";
/// Group object class parameter.
pub const P_GROUP_OBJECT_CLASS: &str = "main.ldapRealm.groupObjectClass";
/// Member attribute value template parameter.
pub const P_MEMBER_ATTRIBUTE_VALUE_TEMPLATE: &str = "main.ldapRealm.memberAttributeValueTemplate";
/// Member attribute parameter.
pub const P_MEMBER_ATTRIBUTE: &str = "main.ldapRealm.memberAttribute";
/// Authorization toggle parameter.
pub const P_AUTHORIZATION_ENABLED: &str = "main.ldapRealm.authorizationEnabled";
/// System (service account) username parameter.
pub const P_SYSTEM_USERNAME: &str = "main.ldapRealm.contextFactory.systemUsername";
/// System (service account) password parameter.
pub const P_SYSTEM_PASSWORD: &str = "main.ldapRealm.contextFactory.systemPassword";
/// User DN template parameter.
pub const P_USER_DN_TEMPLATE: &str = "main.ldapRealm.userDnTemplate";
/// Directory URL parameter.
pub const P_URL: &str = "main.ldapRealm.contextFactory.url";
/// Authentication mechanism parameter.
pub const P_AUTHENTICATION_MECHANISM: &str =
    "main.ldapRealm.contextFactory.authenticationMechanism";

/// The materialized provider-specific security configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityDescriptor {
    /// Topology the descriptor was expanded from.
    pub topology: String,

    /// Provider role.
    pub role: String,

    /// Provider name.
    pub name: String,

    /// Provider parameters.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl SecurityDescriptor {
    /// Loads a descriptor from its materialized file.
    pub fn load(path: &Path) -> AuthResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AuthError::descriptor(format!("{}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| AuthError::descriptor(e.to_string()))
    }

    /// Returns a parameter value, if present.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Returns the descriptor path inside a deployment root.
#[must_use]
pub fn descriptor_path(deployment_root: &Path) -> PathBuf {
    deployment_root.join(DESCRIPTOR_RELATIVE_PATH)
}

/// Materializes a deployment tree for the topology under `base`,
/// returning the deployment root.
///
/// The root is named `{topology}_deploy.tmp`. The security descriptor
/// is written only when the topology carries the supported
/// authentication provider and it is enabled; callers check for its
/// presence.
pub fn materialize_deployment(topology: &Topology, base: &Path) -> AuthResult<PathBuf> {
    let root = base.join(format!("{}_deploy.tmp", topology.name));
    fs::create_dir_all(&root)?;

    if let Err(e) = write_descriptor(topology, &root) {
        // A partial tree must not outlive the failure.
        if let Err(remove) = fs::remove_dir_all(&root) {
            tracing::warn!(root = %root.display(), error = %remove, "partial deployment tree left behind");
        }
        return Err(e);
    }
    Ok(root)
}

fn write_descriptor(topology: &Topology, root: &Path) -> AuthResult<()> {
    let Some(provider) = topology
        .provider(SUPPORTED_PROVIDER_ROLE, SUPPORTED_PROVIDER_NAME)
        .filter(|p| p.enabled)
    else {
        return Ok(());
    };

    let descriptor = SecurityDescriptor {
        topology: topology.name.clone(),
        role: provider.role.clone(),
        name: provider.name.clone(),
        params: provider
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    };
    let path = descriptor_path(root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let rendered =
        toml::to_string_pretty(&descriptor).map_err(|e| AuthError::descriptor(e.to_string()))?;
    fs::write(&path, rendered)?;
    tracing::debug!(topology = %topology.name, path = %path.display(), "security descriptor materialized");
    Ok(())
}
