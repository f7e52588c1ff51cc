//! Structural validation of topology descriptors.
//!
//! TOML carries no schema language, so validation is semantic: the
//! descriptor must parse, declare at least one provider, and keep
//! `(role, name)` pairs unique with non-empty fields.

use std::collections::HashSet;
use std::path::Path;

use crate::error::TopologyResult;
use crate::store::FileTopologyStore;
use crate::topology::Topology;

/// Outcome of validating one descriptor file.
#[derive(Debug)]
pub struct ValidationReport {
    /// Problems found; empty means the descriptor is valid.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Whether the descriptor passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a topology descriptor file.
pub fn validate_file(path: &Path) -> TopologyResult<ValidationReport> {
    let content = std::fs::read_to_string(path)?;
    let mut errors = Vec::new();

    match toml::from_str::<Topology>(&content) {
        Ok(topology) => validate_topology(&topology, &mut errors),
        Err(e) => errors.push(format!("descriptor does not parse: {e}")),
    }

    Ok(ValidationReport { errors })
}

fn validate_topology(topology: &Topology, errors: &mut Vec<String>) {
    if topology.providers.is_empty() {
        errors.push("topology declares no providers".to_string());
    }

    let mut seen = HashSet::new();
    for (idx, provider) in topology.providers.iter().enumerate() {
        if provider.role.trim().is_empty() {
            errors.push(format!("provider #{idx} has an empty role"));
        }
        if provider.name.trim().is_empty() {
            errors.push(format!("provider #{idx} has an empty name"));
        }
        if !seen.insert((provider.role.clone(), provider.name.clone())) {
            errors.push(format!(
                "duplicate provider ({}, {})",
                provider.role, provider.name
            ));
        }
        for key in provider.params.keys() {
            if key.trim().is_empty() {
                errors.push(format!(
                    "provider ({}, {}) has an empty parameter key",
                    provider.role, provider.name
                ));
            }
        }
    }
}

/// Resolves the descriptor to validate: an explicit path wins, then a
/// cluster name against the store's topologies directory.
#[must_use]
pub fn resolve_descriptor(
    store: &FileTopologyStore,
    cluster: Option<&str>,
    path: Option<&str>,
) -> Option<std::path::PathBuf> {
    if let Some(p) = path {
        return Some(std::path::PathBuf::from(p));
    }
    cluster.map(|c| store.descriptor_path(c))
}
