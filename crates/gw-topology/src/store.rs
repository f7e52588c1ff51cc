//! File-backed topology store.
//!
//! Topologies live as TOML descriptors under the gateway's
//! `conf/topologies` directory; deployment artifacts are regenerated
//! under `data/deployments/{name}`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TopologyError, TopologyResult};
use crate::topology::Topology;

/// Narrow interface the CLI consumes for topology lookup and deployment.
pub trait TopologyService {
    /// Re-reads all topology descriptors from disk.
    fn reload(&mut self) -> TopologyResult<()>;

    /// Returns the currently loaded topologies.
    fn topologies(&self) -> &[Topology];

    /// Looks up a loaded topology by name.
    fn find(&self, name: &str) -> Option<&Topology>;

    /// Regenerates the deployment artifact for a topology, returning
    /// the artifact root.
    fn redeploy(&self, name: &str) -> TopologyResult<PathBuf>;
}

/// Topology store reading descriptors from a directory.
#[derive(Debug)]
pub struct FileTopologyStore {
    topologies_dir: PathBuf,
    deployments_dir: PathBuf,
    loaded: Vec<Topology>,
}

impl FileTopologyStore {
    /// Creates a store rooted at the given directories. Nothing is
    /// loaded until [`TopologyService::reload`] is called.
    #[must_use]
    pub fn new(topologies_dir: impl Into<PathBuf>, deployments_dir: impl Into<PathBuf>) -> Self {
        Self {
            topologies_dir: topologies_dir.into(),
            deployments_dir: deployments_dir.into(),
            loaded: Vec::new(),
        }
    }

    /// Returns the topologies directory.
    #[must_use]
    pub fn topologies_dir(&self) -> &Path {
        &self.topologies_dir
    }

    /// Returns the descriptor path for a topology name.
    #[must_use]
    pub fn descriptor_path(&self, name: &str) -> PathBuf {
        self.topologies_dir.join(format!("{name}.toml"))
    }

    /// Lists descriptor file stems without loading them.
    pub fn descriptor_names(&self) -> TopologyResult<Vec<String>> {
        if !self.topologies_dir.is_dir() {
            return Err(TopologyError::DirectoryUnavailable(
                self.topologies_dir.display().to_string(),
            ));
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.topologies_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "toml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_descriptor(path: &Path) -> TopologyResult<Topology> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let content = fs::read_to_string(path)?;
        let mut topology: Topology = toml::from_str(&content)
            .map_err(|e| TopologyError::invalid(stem.clone(), e.to_string()))?;
        if topology.name.is_empty() {
            topology.name = stem;
        }
        Ok(topology)
    }
}

impl TopologyService for FileTopologyStore {
    fn reload(&mut self) -> TopologyResult<()> {
        let names = self.descriptor_names()?;
        let mut loaded = Vec::with_capacity(names.len());
        for name in names {
            let path = self.descriptor_path(&name);
            match Self::load_descriptor(&path) {
                Ok(t) => loaded.push(t),
                Err(e) => {
                    // A broken descriptor must not hide the others.
                    tracing::warn!(topology = %name, error = %e, "skipping unreadable topology");
                }
            }
        }
        tracing::debug!(count = loaded.len(), "topologies reloaded");
        self.loaded = loaded;
        Ok(())
    }

    fn topologies(&self) -> &[Topology] {
        &self.loaded
    }

    fn find(&self, name: &str) -> Option<&Topology> {
        self.loaded.iter().find(|t| t.name == name)
    }

    fn redeploy(&self, name: &str) -> TopologyResult<PathBuf> {
        let topology = self
            .find(name)
            .ok_or_else(|| TopologyError::NotFound(name.to_string()))?;

        let root = self.deployments_dir.join(name);
        fs::create_dir_all(&root)
            .map_err(|e| TopologyError::deployment(name, e.to_string()))?;

        let rendered = toml::to_string_pretty(topology)
            .map_err(|e| TopologyError::deployment(name, e.to_string()))?;
        fs::write(root.join("topology.toml"), rendered)
            .map_err(|e| TopologyError::deployment(name, e.to_string()))?;

        tracing::debug!(topology = %name, root = %root.display(), "deployment regenerated");
        Ok(root)
    }
}
