//! Message encryption for SecureShare.
//!
//! Provides passphrase-based confidentiality for short text messages:
//! - PBKDF2-HMAC-SHA256 for key derivation from the user's key token
//! - AES-256-GCM for authenticated encryption
//! - a colon-delimited envelope that carries the salt with the ciphertext
//!
//! # Envelope format
//!
//! ```text
//! base64(salt_utf8) ":" base64(nonce || ciphertext+tag)
//! ```
//!
//! Because the salt rides inside the envelope, decryption needs only the
//! key token. The sender may still pick a custom salt to diversify the
//! derived key across messages that reuse one token.
//!
//! # Compatibility
//!
//! The default KDF parameters ([`KdfParams::legacy`], 1000 iterations) keep
//! existing envelopes decryptable. That count is low by current standards;
//! see [`KdfParams::modern`] when compatibility is not needed.
//!
//! Both operations are pure functions over their arguments: no I/O, no
//! shared state, safe to call from any thread.

mod cipher;
mod envelope;
mod error;
mod key;

pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use envelope::{
    decrypt_message, decrypt_message_with_params, encrypt_message, encrypt_message_with_params,
    Envelope, ENVELOPE_DELIMITER,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    derive_key, generate_key, DerivedKey, KdfParams, KEY_SIZE, LEGACY_ITERATIONS,
    MODERN_ITERATIONS,
};
