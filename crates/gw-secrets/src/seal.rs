//! AES-256-GCM sealed JSON documents keyed off the master secret.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{SecretsError, SecretsResult};

pub const DOCUMENT_VERSION: u32 = 1;
const NONCE_LEN: usize = 12;

/// An encrypted payload as persisted on disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct SealedDocument {
    pub version: u32,
    pub nonce: String,
    pub ciphertext: String,
}

/// Derives the 256-bit sealing key from the master secret.
pub fn derive_key(master: &str) -> Zeroizing<[u8; 32]> {
    let digest = Sha256::digest(master.as_bytes());
    Zeroizing::new(digest.into())
}

/// Seals a plaintext under the given key with a fresh random nonce.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> SecretsResult<SealedDocument> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| SecretsError::MasterMismatch)?;

    Ok(SealedDocument {
        version: DOCUMENT_VERSION,
        nonce: STANDARD.encode(nonce),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// Opens a sealed document. Any authentication failure is reported as a
/// master secret mismatch.
pub fn open(key: &[u8; 32], document: &SealedDocument) -> SecretsResult<Zeroizing<Vec<u8>>> {
    if document.version != DOCUMENT_VERSION {
        return Err(SecretsError::MasterCorrupt(format!(
            "unsupported store document version {}",
            document.version
        )));
    }

    let nonce = STANDARD
        .decode(&document.nonce)
        .map_err(|e| SecretsError::MasterCorrupt(e.to_string()))?;
    let ciphertext = STANDARD
        .decode(&document.ciphertext)
        .map_err(|e| SecretsError::MasterCorrupt(e.to_string()))?;
    if nonce.len() != NONCE_LEN {
        return Err(SecretsError::MasterCorrupt("bad nonce length".to_string()));
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| SecretsError::MasterMismatch)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_and_open_round_trip() {
        let key = derive_key("sup3rs3cret");
        let doc = seal(&key, b"alias-secret").unwrap();
        let plain = open(&key, &doc).unwrap();
        assert_eq!(plain.as_slice(), b"alias-secret");
    }

    #[test]
    fn wrong_key_is_master_mismatch() {
        let key = derive_key("sup3rs3cret");
        let doc = seal(&key, b"alias-secret").unwrap();
        let other = derive_key("not-the-master");
        assert!(matches!(
            open(&other, &doc),
            Err(SecretsError::MasterMismatch)
        ));
    }

    #[test]
    fn version_checked_on_open() {
        let key = derive_key("sup3rs3cret");
        let mut doc = seal(&key, b"x").unwrap();
        doc.version = 99;
        assert!(matches!(
            open(&key, &doc),
            Err(SecretsError::MasterCorrupt(_))
        ));
    }
}
