//! The secret envelope: sealed items plus settings and metadata.
//!
//! The same shape is uploaded by the creator and returned to openers by the
//! get endpoint.

use serde::{Deserialize, Serialize};

use crate::{ItemKind, ProtocolError};

/// One sealed bundle item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedItem {
    /// Display name (filename or entry title).
    pub name: String,
    /// Item kind.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// `nonce ‖ ciphertext ‖ tag`, base64 on the wire.
    #[serde(with = "crate::b64")]
    pub encrypted_data: Vec<u8>,
    /// Plaintext length in bytes.
    pub original_size: u64,
}

/// Theme colors as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedColors {
    /// Foreground (text) color.
    pub foreground: String,
    /// Background color.
    pub background: String,
    /// Accent color.
    pub accent: String,
}

/// Creator-chosen settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSettings {
    /// Lifetime in seconds.
    pub expiration: u64,
    /// Maximum number of opens. `None` if unlimited.
    #[serde(default)]
    pub view_limit: Option<u32>,
    /// Optional title shown to the opener.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional description shown to the opener.
    #[serde(default)]
    pub description: Option<String>,
    /// Theme colors.
    pub selected_colors: SelectedColors,
}

/// Bookkeeping computed at upload time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMetadata {
    /// Number of items in the envelope.
    pub total_files: usize,
    /// ISO-8601 UTC timestamp of the upload.
    pub upload_time: String,
    /// Sum of the plaintext sizes in bytes.
    pub total_original_size: u64,
}

/// Complete sealed secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretEnvelope {
    /// Sealed items in bundle order.
    pub files: Vec<SealedItem>,
    /// Base64 SHA-256 of the password.
    pub password_hash: String,
    /// Creator-chosen settings.
    pub settings: SecretSettings,
    /// Upload bookkeeping.
    pub metadata: SecretMetadata,
}

impl SecretEnvelope {
    /// Encode as a JSON body.
    pub fn to_json(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self)
            .map_err(|e| ProtocolError::Encode { message: "SecretEnvelope", reason: e.to_string() })
    }

    /// Decode from a JSON body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(bytes).map_err(|e| ProtocolError::Malformed {
            message: "SecretEnvelope",
            reason: e.to_string(),
        })
    }

    /// Encoded size of the sealed item payloads in bytes.
    pub fn sealed_bytes(&self) -> usize {
        self.files.iter().map(|f| f.encrypted_data.len()).sum()
    }
}
