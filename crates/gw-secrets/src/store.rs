//! Per-cluster credential stores.
//!
//! An alias is a named secret scoped to a cluster. Each cluster's
//! aliases live in one sealed JSON document under
//! `{security}/keystores/{cluster}-credentials.json`, encrypted with a
//! key derived from the master secret.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::error::{SecretsError, SecretsResult};
use crate::seal::{self, SealedDocument};

type AliasMap = BTreeMap<String, String>;

/// Credential store access keyed off the master secret.
pub struct AliasService {
    security_dir: PathBuf,
    key: Zeroizing<[u8; 32]>,
}

// Hand-written so the sealing key never reaches debug output.
impl fmt::Debug for AliasService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasService")
            .field("security_dir", &self.security_dir)
            .finish_non_exhaustive()
    }
}

impl AliasService {
    /// Creates an alias service for the given security directory and
    /// master secret.
    #[must_use]
    pub fn new(security_dir: impl Into<PathBuf>, master: &str) -> Self {
        Self {
            security_dir: security_dir.into(),
            key: seal::derive_key(master),
        }
    }

    fn store_path(&self, cluster: &str) -> PathBuf {
        self.security_dir
            .join("keystores")
            .join(format!("{cluster}-credentials.json"))
    }

    /// Whether a credential store exists for the cluster.
    #[must_use]
    pub fn store_exists(&self, cluster: &str) -> bool {
        self.store_path(cluster).is_file()
    }

    /// Creates an empty credential store for the cluster.
    pub fn create_store(&self, cluster: &str) -> SecretsResult<()> {
        if self.store_exists(cluster) {
            return Ok(());
        }
        self.write_aliases(cluster, &AliasMap::new())
    }

    /// Lists alias names for the cluster, sorted.
    pub fn list(&self, cluster: &str) -> SecretsResult<Vec<String>> {
        let aliases = self.read_aliases(cluster)?;
        Ok(aliases.keys().cloned().collect())
    }

    /// Adds an alias with an explicit secret value.
    pub fn add(&self, cluster: &str, name: &str, value: &str) -> SecretsResult<()> {
        let mut aliases = self.read_or_empty(cluster)?;
        aliases.insert(name.to_string(), value.to_string());
        self.write_aliases(cluster, &aliases)
    }

    /// Adds an alias with a freshly generated random secret.
    pub fn generate(&self, cluster: &str, name: &str) -> SecretsResult<()> {
        let secret = uuid::Uuid::new_v4().to_string();
        self.add(cluster, name, &secret)
    }

    /// Removes an alias from the cluster's store.
    pub fn remove(&self, cluster: &str, name: &str) -> SecretsResult<()> {
        let mut aliases = self.read_aliases(cluster)?;
        if aliases.remove(name).is_none() {
            return Err(SecretsError::AliasNotFound(name.to_string()));
        }
        self.write_aliases(cluster, &aliases)
    }

    /// Returns the secret behind an alias, if present.
    pub fn password_for(&self, cluster: &str, name: &str) -> SecretsResult<Option<String>> {
        if !self.store_exists(cluster) {
            return Ok(None);
        }
        let aliases = self.read_aliases(cluster)?;
        Ok(aliases.get(name).cloned())
    }

    fn read_or_empty(&self, cluster: &str) -> SecretsResult<AliasMap> {
        if self.store_exists(cluster) {
            self.read_aliases(cluster)
        } else {
            Ok(AliasMap::new())
        }
    }

    fn read_aliases(&self, cluster: &str) -> SecretsResult<AliasMap> {
        let path = self.store_path(cluster);
        if !path.is_file() {
            return Err(SecretsError::StoreMissing(cluster.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        let document: SealedDocument = serde_json::from_str(&content)?;
        let plaintext = seal::open(&self.key, &document)?;
        let aliases: AliasMap = serde_json::from_slice(&plaintext)?;
        Ok(aliases)
    }

    fn write_aliases(&self, cluster: &str, aliases: &AliasMap) -> SecretsResult<()> {
        let path = self.store_path(cluster);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let plaintext = serde_json::to_vec(aliases)?;
        let document = seal::seal(&self.key, &plaintext)?;
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        tracing::debug!(cluster, count = aliases.len(), "credential store written");
        Ok(())
    }
}
