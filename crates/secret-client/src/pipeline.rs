//! Submission pipeline.
//!
//! Turns a [`Bundle`] into a [`SecretEnvelope`] and uploads it. Stages run in
//! order and the first failure ends the run:
//!
//! 1. Seal: every item under the password-derived key with a fresh nonce
//! 2. Hash: base64 SHA-256 of the password
//! 3. Assemble: sealed items, hash, settings and metadata
//! 4. Transmit: upload and return the service-assigned ID
//!
//! Stages 1-3 are pure and synchronous ([`seal_bundle`]). [`submit`] runs
//! them on the blocking pool and then transmits.

use chrono::{DateTime, SecondsFormat, Utc};
use secret_core::{Bundle, ContentItem, Environment};
use secret_crypto::{NONCE_SIZE, derive_item_key, hash_password, seal_item};
use secret_proto::{SealedItem, SecretEnvelope, SecretMetadata, SecretSettings, SelectedColors};

use crate::{SecretService, SubmitError};

/// Seal each item under the key derived from `password`.
///
/// Each item gets its own nonce from `env`.
///
/// # Errors
///
/// - `Seal` naming the first item that failed
pub fn seal_items<E: Environment>(
    env: &E,
    password: &str,
    items: &[ContentItem],
) -> Result<Vec<SealedItem>, SubmitError> {
    let key = derive_item_key(password);

    items
        .iter()
        .map(|item| {
            let nonce: [u8; NONCE_SIZE] = env.random_array();
            let encrypted_data = seal_item(item.payload(), &key, nonce)
                .map_err(|source| SubmitError::Seal { name: item.name().to_string(), source })?;

            Ok(SealedItem {
                name: item.name().to_string(),
                kind: item.kind(),
                encrypted_data,
                original_size: item.size(),
            })
        })
        .collect()
}

/// Creator settings as sent on the wire.
pub fn settings_for(bundle: &Bundle) -> SecretSettings {
    SecretSettings {
        expiration: bundle.expiration().as_secs(),
        view_limit: bundle.view_limit().map(std::num::NonZeroU32::get),
        title: bundle.title().map(str::to_string),
        description: bundle.description().map(str::to_string),
        selected_colors: SelectedColors::from(bundle.theme()),
    }
}

/// Assemble the upload payload from already sealed items.
pub fn assemble_payload(
    bundle: &Bundle,
    files: Vec<SealedItem>,
    password_hash: String,
    upload_time: DateTime<Utc>,
) -> SecretEnvelope {
    SecretEnvelope {
        metadata: SecretMetadata {
            total_files: files.len(),
            upload_time: upload_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_original_size: bundle.total_bytes(),
        },
        files,
        password_hash,
        settings: settings_for(bundle),
    }
}

/// Run the seal, hash and assemble stages.
///
/// # Errors
///
/// - `EmptyBundle` if there is nothing to seal
/// - `MissingPassword` if the password is blank
/// - `Seal` if any item fails to encrypt
pub fn seal_bundle<E: Environment>(env: &E, bundle: &Bundle) -> Result<SecretEnvelope, SubmitError> {
    if bundle.is_empty() {
        return Err(SubmitError::EmptyBundle);
    }
    if !bundle.has_password() {
        return Err(SubmitError::MissingPassword);
    }

    let files = seal_items(env, bundle.password(), bundle.items())?;
    let password_hash = hash_password(bundle.password());
    let envelope = assemble_payload(bundle, files, password_hash, env.now());

    tracing::debug!(
        items = envelope.metadata.total_files,
        sealed_bytes = envelope.sealed_bytes(),
        "bundle sealed"
    );
    Ok(envelope)
}

/// Run [`seal_bundle`] on the blocking thread pool.
///
/// # Errors
///
/// As [`seal_bundle`], plus `Task` if the blocking task is cancelled or
/// panics.
pub async fn seal_bundle_blocking<E: Environment>(
    env: E,
    bundle: Bundle,
) -> Result<SecretEnvelope, SubmitError> {
    tokio::task::spawn_blocking(move || seal_bundle(&env, &bundle))
        .await
        .map_err(|e| SubmitError::Task { reason: e.to_string() })?
}

/// Upload a sealed envelope and return the assigned ID.
///
/// # Errors
///
/// - `UploadFailed` on transport failure, a non-success response, or an
///   empty ID
pub async fn transmit<S: SecretService>(
    service: &S,
    envelope: &SecretEnvelope,
) -> Result<String, SubmitError> {
    let response = service
        .upload(envelope)
        .await
        .map_err(|e| SubmitError::UploadFailed { reason: e.to_string() })?;

    if response.id.trim().is_empty() {
        return Err(SubmitError::UploadFailed { reason: "service returned an empty ID".into() });
    }

    tracing::info!(
        id = %response.id,
        message = response.message.as_deref().unwrap_or_default(),
        "secret uploaded"
    );
    Ok(response.id)
}

/// Seal and upload `bundle`, returning the secret ID.
///
/// The bundle itself is not modified; recording the ID is the caller's job.
///
/// # Errors
///
/// Any error from [`seal_bundle_blocking`] or [`transmit`].
pub async fn submit<S, E>(service: &S, env: &E, bundle: &Bundle) -> Result<String, SubmitError>
where
    S: SecretService,
    E: Environment,
{
    let envelope = seal_bundle_blocking(env.clone(), bundle.clone()).await?;
    transmit(service, &envelope).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use secret_core::{Appearance, Expiration, ItemKind, RawFile, SeededEnv};
    use secret_crypto::{TAG_SIZE, open_item, verify_password};

    use super::*;

    fn bundle() -> Bundle {
        let mut bundle = Bundle::new(1 << 20, Appearance::Dark);
        bundle.add_files(vec![RawFile::new("a.bin", vec![7; 100])]).unwrap();
        bundle.add_text_or_link(ItemKind::Link, "site", "https://example.com").unwrap();
        bundle.set_password("abc123");
        bundle
    }

    #[test]
    fn seal_bundle_rejects_missing_password() {
        let mut b = bundle();
        b.set_password("   ");
        assert_eq!(seal_bundle(&SeededEnv::with_seed(1), &b), Err(SubmitError::MissingPassword));
    }

    #[test]
    fn seal_bundle_rejects_empty_bundle() {
        let mut b = Bundle::new(10, Appearance::Dark);
        b.set_password("pw");
        assert_eq!(seal_bundle(&SeededEnv::with_seed(1), &b), Err(SubmitError::EmptyBundle));
    }

    #[test]
    fn sealed_items_open_with_password() {
        let b = bundle();
        let envelope = seal_bundle(&SeededEnv::with_seed(1), &b).unwrap();

        let key = derive_item_key("abc123");
        for (sealed, item) in envelope.files.iter().zip(b.items()) {
            assert_eq!(sealed.name, item.name());
            assert_eq!(sealed.kind, item.kind());
            assert_eq!(sealed.original_size, item.size());
            assert_eq!(sealed.encrypted_data.len(), NONCE_SIZE + item.payload().len() + TAG_SIZE);
            assert_eq!(open_item(&sealed.encrypted_data, &key).unwrap(), item.payload());
        }
    }

    #[test]
    fn nonces_differ_per_item() {
        let envelope = seal_bundle(&SeededEnv::with_seed(9), &bundle()).unwrap();
        let first = &envelope.files[0].encrypted_data[..NONCE_SIZE];
        let second = &envelope.files[1].encrypted_data[..NONCE_SIZE];
        assert_ne!(first, second);
    }

    #[test]
    fn payload_carries_settings_and_metadata() {
        let mut b = bundle();
        b.set_expiration(Expiration::OneWeek);
        b.set_view_limit(NonZeroU32::new(3));
        b.set_title("Hello");

        let envelope = seal_bundle(&SeededEnv::with_seed(1), &b).unwrap();

        assert!(verify_password("abc123", &envelope.password_hash));
        assert_eq!(envelope.settings.expiration, 604_800);
        assert_eq!(envelope.settings.view_limit, Some(3));
        assert_eq!(envelope.settings.title.as_deref(), Some("Hello"));
        assert_eq!(envelope.settings.description, None);
        assert_eq!(envelope.settings.selected_colors.background, "#1f2937");
        assert_eq!(envelope.metadata.total_files, 2);
        assert_eq!(envelope.metadata.total_original_size, 119);
        assert_eq!(envelope.metadata.upload_time, "1970-01-02T00:00:00.000Z");
    }

    #[test]
    fn same_seed_seals_identically() {
        let a = seal_bundle(&SeededEnv::with_seed(5), &bundle()).unwrap();
        let b = seal_bundle(&SeededEnv::with_seed(5), &bundle()).unwrap();
        assert_eq!(a, b);
    }
}
