//! Master secret persistence.
//!
//! The master secret is the root secret protecting the gateway's local
//! stores. It lives in a single file under the security directory and
//! is held zeroized in memory.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use zeroize::Zeroizing;

use crate::error::{SecretsError, SecretsResult};

const MASTER_FILE: &str = "master";
const HEADER: &str = "v1:";

/// Reads and persists the master secret file.
#[derive(Debug, Clone)]
pub struct MasterService {
    security_dir: PathBuf,
}

impl MasterService {
    /// Creates a service rooted at the gateway security directory.
    #[must_use]
    pub fn new(security_dir: impl Into<PathBuf>) -> Self {
        Self {
            security_dir: security_dir.into(),
        }
    }

    /// Returns the security directory.
    #[must_use]
    pub fn security_dir(&self) -> &Path {
        &self.security_dir
    }

    /// Returns the master secret file path.
    #[must_use]
    pub fn master_path(&self) -> PathBuf {
        self.security_dir.join(MASTER_FILE)
    }

    /// Whether a master secret has been persisted.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.master_path().is_file()
    }

    /// Reads the persisted master secret.
    pub fn read(&self) -> SecretsResult<Zeroizing<String>> {
        let path = self.master_path();
        if !path.is_file() {
            return Err(SecretsError::MasterMissing(path.display().to_string()));
        }
        let content = fs::read_to_string(&path)?;
        let line = content.trim();
        let encoded = line
            .strip_prefix(HEADER)
            .ok_or_else(|| SecretsError::MasterCorrupt("missing version header".to_string()))?;
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|e| SecretsError::MasterCorrupt(e.to_string()))?;
        let secret = String::from_utf8(decoded)
            .map_err(|e| SecretsError::MasterCorrupt(e.to_string()))?;
        Ok(Zeroizing::new(secret))
    }

    /// Persists the master secret, creating the security directory when
    /// needed. Refuses to overwrite unless `force` is set.
    pub fn persist(&self, secret: &str, force: bool) -> SecretsResult<()> {
        let path = self.master_path();
        if path.is_file() && !force {
            return Err(SecretsError::Keystore(format!(
                "master secret already present at {}",
                path.display()
            )));
        }
        fs::create_dir_all(&self.security_dir)?;
        let line = format!("{HEADER}{}\n", STANDARD.encode(secret.as_bytes()));
        fs::write(&path, line)?;
        tracing::debug!(path = %path.display(), "master secret persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_and_read_back() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = MasterService::new(tmp.path().join("security"));
        assert!(!svc.is_present());

        svc.persist("sup3rs3cret", false).unwrap();
        assert!(svc.is_present());
        assert_eq!(svc.read().unwrap().as_str(), "sup3rs3cret");
    }

    #[test]
    fn refuses_overwrite_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = MasterService::new(tmp.path());
        svc.persist("first", false).unwrap();
        assert!(svc.persist("second", false).is_err());

        svc.persist("second", true).unwrap();
        assert_eq!(svc.read().unwrap().as_str(), "second");
    }

    #[test]
    fn missing_master_is_distinct_from_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = MasterService::new(tmp.path());
        assert!(matches!(svc.read(), Err(SecretsError::MasterMissing(_))));

        fs::write(svc.master_path(), "no-header-here").unwrap();
        assert!(matches!(svc.read(), Err(SecretsError::MasterCorrupt(_))));
    }
}
