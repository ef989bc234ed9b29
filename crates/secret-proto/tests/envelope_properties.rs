//! Property-based tests for envelope encoding.
//!
//! Arbitrary sealed bytes and names must survive the JSON/base64 boundary
//! unchanged.

use proptest::prelude::*;
use secret_proto::{
    ItemKind, SealedItem, SecretEnvelope, SecretMetadata, SecretSettings, SelectedColors,
};

fn kind_strategy() -> impl Strategy<Value = ItemKind> {
    prop_oneof![Just(ItemKind::File), Just(ItemKind::Link), Just(ItemKind::Text)]
}

fn item_strategy() -> impl Strategy<Value = SealedItem> {
    ("\\PC{1,32}", kind_strategy(), prop::collection::vec(any::<u8>(), 0..256)).prop_map(
        |(name, kind, encrypted_data)| SealedItem {
            name,
            kind,
            original_size: encrypted_data.len() as u64,
            encrypted_data,
        },
    )
}

proptest! {
    #[test]
    fn prop_envelope_survives_json(
        files in prop::collection::vec(item_strategy(), 0..6),
        view_limit in prop::option::of(1u32..1000),
        title in prop::option::of("\\PC{0,40}"),
    ) {
        let envelope = SecretEnvelope {
            metadata: SecretMetadata {
                total_files: files.len(),
                upload_time: "2026-10-18T00:00:00.000Z".into(),
                total_original_size: files.iter().map(|f| f.original_size).sum(),
            },
            files,
            password_hash: "digest".into(),
            settings: SecretSettings {
                expiration: 604_800,
                view_limit,
                title,
                description: None,
                selected_colors: SelectedColors {
                    foreground: "#111827".into(),
                    background: "#ffffff".into(),
                    accent: "#3b82f6".into(),
                },
            },
        };

        let decoded = SecretEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();
        prop_assert_eq!(decoded, envelope);
    }
}
