//! Unlocking a fetched secret.
//!
//! The candidate password is checked against the stored hash first, so a
//! wrong password never reaches the decryption stage. Only a verified
//! password is used to open items.

use secret_core::ContentItem;
use secret_crypto::{derive_item_key, open_item, verify_password};
use secret_proto::SecretEnvelope;

use crate::OpenError;

/// Check a candidate password against the envelope's stored hash.
///
/// # Errors
///
/// - `EmptyPassword` if the candidate is empty (not hashed)
/// - `IncorrectPassword` if the hash does not match
pub fn verify_candidate(envelope: &SecretEnvelope, candidate: &str) -> Result<(), OpenError> {
    if candidate.is_empty() {
        return Err(OpenError::EmptyPassword);
    }
    if !verify_password(candidate, &envelope.password_hash) {
        return Err(OpenError::IncorrectPassword);
    }
    Ok(())
}

/// Decrypt every item in the envelope.
///
/// Fails on the first item that does not open; partial results are dropped.
pub fn decrypt_items(
    envelope: &SecretEnvelope,
    password: &str,
) -> Result<Vec<ContentItem>, OpenError> {
    let key = derive_item_key(password);

    envelope
        .files
        .iter()
        .map(|sealed| {
            let payload = open_item(&sealed.encrypted_data, &key).map_err(|e| {
                OpenError::DecryptionFailed { name: sealed.name.clone(), reason: e.to_string() }
            })?;

            if payload.len() as u64 != sealed.original_size {
                tracing::warn!(
                    name = %sealed.name,
                    expected = sealed.original_size,
                    actual = payload.len(),
                    "decrypted size differs from recorded size"
                );
            }
            Ok(ContentItem::new(sealed.name.clone(), sealed.kind, payload))
        })
        .collect()
}

/// Verify `password` and decrypt all items.
pub fn open_envelope(
    envelope: &SecretEnvelope,
    password: &str,
) -> Result<Vec<ContentItem>, OpenError> {
    verify_candidate(envelope, password)?;
    decrypt_items(envelope, password)
}

/// Run [`decrypt_items`] on the blocking thread pool.
pub async fn decrypt_items_blocking(
    envelope: SecretEnvelope,
    password: String,
) -> Result<Vec<ContentItem>, OpenError> {
    tokio::task::spawn_blocking(move || decrypt_items(&envelope, &password))
        .await
        .map_err(|e| OpenError::Task { reason: e.to_string() })?
}
