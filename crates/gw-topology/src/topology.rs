//! Topology and provider model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named, parameterized plugin role within a topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Provider role, e.g. `authentication`.
    pub role: String,

    /// Provider name within the role, e.g. `LdapProvider`.
    pub name: String,

    /// Whether the provider is active in the topology.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Provider parameters. Keys are unique; ordering is irrelevant.
    #[serde(default)]
    pub params: HashMap<String, String>,
}

const fn default_enabled() -> bool {
    true
}

impl Provider {
    /// Returns the value of a parameter, if present.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// A named cluster configuration: an ordered set of providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    /// Topology (cluster) name. Derived from the descriptor file stem
    /// when absent from the document.
    #[serde(default)]
    pub name: String,

    /// Providers in declaration order.
    #[serde(default, rename = "provider")]
    pub providers: Vec<Provider>,
}

impl Topology {
    /// Creates an empty topology with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            providers: Vec::new(),
        }
    }

    /// Looks up a provider by `(role, name)`.
    #[must_use]
    pub fn provider(&self, role: &str, name: &str) -> Option<&Provider> {
        self.providers
            .iter()
            .find(|p| p.role == role && p.name == name)
    }

}
