//! AES-256-GCM sealing of message bytes.
//!
//! Each call draws a fresh random nonce, so encrypting the same message
//! twice yields different ciphertexts. The GCM tag gives the integrity
//! check that turns "wrong key" into a clean failure instead of garbage.

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;

/// AES-GCM standard nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// A sealed message: nonce plus ciphertext-with-tag.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedData {
    /// Per-message random nonce.
    pub nonce: [u8; NONCE_SIZE],
    /// AES-256-GCM ciphertext followed by the 16-byte tag.
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Serializes as `nonce || ciphertext+tag`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parses the `nonce || ciphertext+tag` layout.
    ///
    /// Anything shorter than a nonce plus one tag cannot be a sealed
    /// message and is rejected as malformed.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::MalformedEnvelope(format!(
                "ciphertext too short ({} bytes)",
                bytes.len()
            )));
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

/// Seals `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher.encrypt(&nonce, plaintext).map_err(|e| {
        tracing::error!(error = %e, "AES-GCM encryption failed");
        CryptoError::CipherFailure(format!("aead encrypt: {e}"))
    })?;

    Ok(EncryptedData {
        nonce: nonce.into(),
        ciphertext,
    })
}

/// Opens a sealed message. Fails if the key is wrong or the data was
/// tampered with; the two cases are indistinguishable by construction.
pub fn decrypt(key: &DerivedKey, data: &EncryptedData) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Nonce::from_slice(&data.nonce);

    cipher
        .decrypt(nonce, data.ciphertext.as_ref())
        .map_err(|_| CryptoError::WrongKeyOrCorrupted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{derive_key, KdfParams};

    fn test_key(token: &str) -> DerivedKey {
        derive_key(token, "", &KdfParams::default())
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = test_key("k1");
        let sealed = encrypt(&key, b"payload").unwrap();
        let opened = decrypt(&key, &sealed).unwrap();
        assert_eq!(opened, b"payload");
    }

    #[test]
    fn wrong_key_fails_to_open() {
        let sealed = encrypt(&test_key("k1"), b"payload").unwrap();
        let result = decrypt(&test_key("k2"), &sealed);
        assert!(matches!(result, Err(CryptoError::WrongKeyOrCorrupted)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = test_key("k1");
        let mut sealed = encrypt(&key, b"payload").unwrap();
        sealed.ciphertext[0] ^= 0xFF;
        assert!(matches!(
            decrypt(&key, &sealed),
            Err(CryptoError::WrongKeyOrCorrupted)
        ));
    }

    #[test]
    fn tampered_nonce_fails() {
        let key = test_key("k1");
        let mut sealed = encrypt(&key, b"payload").unwrap();
        sealed.nonce[0] ^= 0xFF;
        assert!(matches!(
            decrypt(&key, &sealed),
            Err(CryptoError::WrongKeyOrCorrupted)
        ));
    }

    #[test]
    fn sealing_twice_differs() {
        let key = test_key("k1");
        let a = encrypt(&key, b"payload").unwrap();
        let b = encrypt(&key, b"payload").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn byte_layout_roundtrip() {
        let key = test_key("k1");
        let sealed = encrypt(&key, b"payload").unwrap();
        let bytes = sealed.to_bytes();
        assert_eq!(EncryptedData::from_bytes(&bytes).unwrap(), sealed);
    }

    #[test]
    fn short_byte_layout_is_malformed() {
        let result = EncryptedData::from_bytes(&[0u8; NONCE_SIZE + TAG_SIZE - 1]);
        assert!(matches!(result, Err(CryptoError::MalformedEnvelope(_))));
    }
}
