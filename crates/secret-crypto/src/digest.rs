//! Password digest for unlock verification.
//!
//! The service stores the base64 SHA-256 digest of the password. Openers hash
//! their candidate the same way and compare before attempting decryption.

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

const DIGEST_SIZE: usize = 32;

/// Raw SHA-256 digest of the password's UTF-8 bytes.
pub fn password_digest(password: &str) -> [u8; DIGEST_SIZE] {
    Sha256::digest(password.as_bytes()).into()
}

/// Base64 (standard alphabet, padded) SHA-256 digest of the password.
pub fn hash_password(password: &str) -> String {
    STANDARD.encode(password_digest(password))
}

/// Check a candidate password against a stored base64 digest.
///
/// Returns `false` for malformed stored digests instead of erroring; a digest
/// that cannot be decoded can never match.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    match STANDARD.decode(stored_hash.trim()) {
        Ok(stored) => stored.as_slice() == password_digest(candidate).as_slice(),
        Err(_) => false,
    }
}
