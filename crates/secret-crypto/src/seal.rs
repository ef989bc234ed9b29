//! Item sealing using AES-256-GCM.
//!
//! All functions are pure - the nonce must be provided by the caller.
//! Sealed layout: `nonce (12) ‖ ciphertext ‖ tag (16)`.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};

use crate::{derivation::ItemKey, error::CryptoError};

/// AES-GCM nonce size (12 bytes).
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Length of a sealed item for a given plaintext length.
pub const fn sealed_len(plaintext_len: usize) -> usize {
    NONCE_SIZE + plaintext_len + TAG_SIZE
}

/// Seal an item's plaintext under `key` with the given nonce.
///
/// Returns `nonce ‖ ciphertext ‖ tag`.
///
/// # Security
///
/// - Caller MUST provide a fresh random nonce for every call in production;
///   reusing a nonce under the same key breaks confidentiality
/// - Authenticated encryption prevents undetected tampering
pub fn seal_item(
    plaintext: &[u8],
    key: &ItemKey,
    nonce: [u8; NONCE_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed { reason: e.to_string() })?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a sealed item.
///
/// # Errors
///
/// - `Truncated`: input cannot hold a nonce and a tag
/// - `DecryptionFailed`: authentication tag or key is incorrect (tamper)
pub fn open_item(sealed: &[u8], key: &ItemKey) -> Result<Vec<u8>, CryptoError> {
    let min = NONCE_SIZE + TAG_SIZE;
    if sealed.len() < min {
        return Err(CryptoError::Truncated { len: sealed.len(), min });
    }

    let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher.decrypt(Nonce::from_slice(nonce), ciphertext).map_err(|_| {
        CryptoError::DecryptionFailed { reason: "authentication failed".to_string() }
    })
}
