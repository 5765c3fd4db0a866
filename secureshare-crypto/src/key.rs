//! Key generation and derivation.
//!
//! The user-held secret is an opaque random token (UUID v4). The symmetric
//! key actually used by the cipher is stretched from that token plus a
//! caller-chosen salt with PBKDF2-HMAC-SHA256. The salt is not secret; it
//! diversifies the derived key when the same token is reused and travels
//! inside the envelope, so decryption only ever needs the token.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Derived key length in bytes (256-bit).
pub const KEY_SIZE: usize = 32;

/// PBKDF2 iteration count used by every envelope produced to date.
///
/// 1000 is far below current guidance (OWASP suggests 600k for
/// PBKDF2-HMAC-SHA256). It is kept as the default only because envelopes
/// already in circulation were derived with it; raising it silently would
/// make them undecryptable. New deployments without that constraint should
/// use [`KdfParams::modern`].
pub const LEGACY_ITERATIONS: u32 = 1000;

/// Iteration count for deployments that do not need legacy envelopes.
pub const MODERN_ITERATIONS: u32 = 600_000;

/// Symmetric key material derived from (key token, salt).
///
/// Exists only transiently during an encrypt or decrypt call and is
/// zeroized on drop. Never serialized or logged.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Tunable key-derivation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2-HMAC-SHA256 iteration count.
    pub iterations: u32,
}

impl KdfParams {
    /// Compatibility parameters: decrypts and produces envelopes
    /// interoperable with the existing corpus.
    pub fn legacy() -> Self {
        Self {
            iterations: LEGACY_ITERATIONS,
        }
    }

    /// Hardened parameters for greenfield use.
    pub fn modern() -> Self {
        Self {
            iterations: MODERN_ITERATIONS,
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::legacy()
    }
}

/// Stretches a key token and salt into 256-bit key material.
///
/// Deterministic: the same (token, salt, params) triple always yields the
/// same key, which is what lets a recipient re-derive it from the salt
/// recovered out of the envelope.
pub fn derive_key(token: &str, salt: &str, params: &KdfParams) -> DerivedKey {
    let mut out = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        token.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut out,
    );
    DerivedKey(out)
}

/// Generates a fresh 128-bit random key token in canonical UUID form.
///
/// The caller is responsible for retaining it; nothing is persisted here.
pub fn generate_key() -> String {
    Uuid::new_v4().to_string()
}
