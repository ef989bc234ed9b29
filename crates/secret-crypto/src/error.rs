//! Error types for item sealing.

use thiserror::Error;

/// Errors from sealing or opening an item.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Sealed input is shorter than nonce plus authentication tag.
    #[error("sealed item too short: {len} bytes, need at least {min}")]
    Truncated {
        /// Length of the input
        len: usize,
        /// Minimum length of a sealed item
        min: usize,
    },

    /// AEAD refused to encrypt (plaintext exceeds the AES-GCM limit).
    #[error("encryption failed: {reason}")]
    EncryptionFailed {
        /// Failure description
        reason: String,
    },

    /// Authentication tag did not verify (wrong key or tampered data).
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Failure description
        reason: String,
    },
}
