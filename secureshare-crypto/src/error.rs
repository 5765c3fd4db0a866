//! Codec error types.

use thiserror::Error;

/// Result type for codec operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while encrypting or decrypting a message.
///
/// Every failure path of the codec is classified into one of these kinds;
/// raw errors from the underlying primitives never cross the crate boundary.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encrypt was called with an empty or whitespace-only message.
    #[error("message is empty")]
    EmptyPlaintext,

    /// Encrypt or decrypt was called with a blank encryption key.
    #[error("encryption key is empty")]
    EmptyKey,

    /// The envelope string is not in the `base64-salt:ciphertext` format.
    ///
    /// The reason describes the structural problem (missing delimiter, bad
    /// Base64, empty ciphertext field) and is safe to show to the user.
    #[error("invalid message format: {0}")]
    MalformedEnvelope(String),

    /// The ciphertext did not open under the supplied key.
    ///
    /// Deliberately does not say whether the key was wrong or the
    /// ciphertext corrupted; the two are indistinguishable to the caller.
    #[error("invalid key or message")]
    WrongKeyOrCorrupted,

    /// Unexpected failure inside the cipher primitives.
    ///
    /// The detail string is carried for logging only; the display form
    /// stays generic so internals never reach an untrusted channel.
    #[error("encryption failed: an unexpected error occurred")]
    CipherFailure(String),
}

impl CryptoError {
    /// Stable tag for diagnostics and log correlation.
    pub fn kind(&self) -> &'static str {
        match self {
            CryptoError::EmptyPlaintext => "empty_plaintext",
            CryptoError::EmptyKey => "empty_key",
            CryptoError::MalformedEnvelope(_) => "malformed_envelope",
            CryptoError::WrongKeyOrCorrupted => "wrong_key_or_corrupted",
            CryptoError::CipherFailure(_) => "cipher_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cipher_failure_display_hides_detail() {
        let err = CryptoError::CipherFailure("aead: invalid tag length".into());
        assert!(!err.to_string().contains("aead"));
    }

    #[test]
    fn wrong_key_display_does_not_disambiguate() {
        let msg = CryptoError::WrongKeyOrCorrupted.to_string();
        assert_eq!(msg, "invalid key or message");
    }
}
