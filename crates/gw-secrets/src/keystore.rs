//! Gateway identity keystore.
//!
//! Holds the gateway's identity: a self-signed certificate (plain PEM)
//! and its private key, sealed under the identity passphrase.

use std::fs;
use std::path::{Path, PathBuf};

use rcgen::{CertificateParams, DnType, KeyPair};

use crate::error::{SecretsError, SecretsResult};
use crate::seal::{self, SealedDocument};

const CERT_FILE: &str = "gateway-identity.pem";
const KEY_FILE: &str = "gateway-identity.key.json";

/// Creates and inspects the gateway identity keystore.
#[derive(Debug, Clone)]
pub struct KeystoreService {
    security_dir: PathBuf,
}

impl KeystoreService {
    /// Creates a keystore service rooted at the security directory.
    #[must_use]
    pub fn new(security_dir: impl Into<PathBuf>) -> Self {
        Self {
            security_dir: security_dir.into(),
        }
    }

    fn keystores_dir(&self) -> PathBuf {
        self.security_dir.join("keystores")
    }

    /// Returns the identity certificate path.
    #[must_use]
    pub fn cert_path(&self) -> PathBuf {
        self.keystores_dir().join(CERT_FILE)
    }

    /// Returns the sealed identity key path.
    #[must_use]
    pub fn key_path(&self) -> PathBuf {
        self.keystores_dir().join(KEY_FILE)
    }

    /// Whether the identity keystore directory exists.
    #[must_use]
    pub fn identity_keystore_exists(&self) -> bool {
        self.keystores_dir().is_dir()
    }

    /// Creates the identity keystore directory.
    pub fn create_identity_keystore(&self) -> SecretsResult<()> {
        fs::create_dir_all(self.keystores_dir())?;
        Ok(())
    }

    /// Whether an identity certificate has been created.
    #[must_use]
    pub fn identity_cert_exists(&self) -> bool {
        self.cert_path().is_file() && self.key_path().is_file()
    }

    /// Generates a self-signed gateway identity certificate for the
    /// hostname, sealing the private key under the passphrase.
    pub fn add_self_signed_cert(&self, hostname: &str, passphrase: &str) -> SecretsResult<()> {
        self.create_identity_keystore()?;

        let key_pair =
            KeyPair::generate().map_err(|e| SecretsError::keystore(e.to_string()))?;
        let mut params = CertificateParams::new(vec![hostname.to_string()])
            .map_err(|e| SecretsError::keystore(e.to_string()))?;
        params
            .distinguished_name
            .push(DnType::CommonName, hostname);
        let cert = params
            .self_signed(&key_pair)
            .map_err(|e| SecretsError::keystore(e.to_string()))?;

        fs::write(self.cert_path(), cert.pem())?;

        let key = seal::derive_key(passphrase);
        let sealed = seal::seal(&key, key_pair.serialize_pem().as_bytes())?;
        fs::write(self.key_path(), serde_json::to_string_pretty(&sealed)?)?;

        tracing::debug!(hostname, cert = %self.cert_path().display(), "identity certificate created");
        Ok(())
    }

    /// Reads back the identity private key PEM, for verification.
    pub fn identity_key_pem(&self, passphrase: &str) -> SecretsResult<String> {
        let content = fs::read_to_string(self.key_path())?;
        let sealed: SealedDocument = serde_json::from_str(&content)?;
        let key = seal::derive_key(passphrase);
        let pem = seal::open(&key, &sealed)?;
        String::from_utf8(pem.to_vec())
            .map_err(|e| SecretsError::keystore(e.to_string()))
    }
}

/// Returns true when the path looks like a PEM certificate.
#[must_use]
pub fn is_pem_certificate(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains("BEGIN CERTIFICATE"))
        .unwrap_or(false)
}
