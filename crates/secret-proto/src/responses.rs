//! Service responses.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Response to a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable status from the service.
    #[serde(default)]
    pub message: Option<String>,
    /// Identifier of the stored secret.
    #[serde(rename = "ID")]
    pub id: String,
}

impl UploadResponse {
    /// Decode from a JSON body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(bytes).map_err(|e| ProtocolError::Malformed {
            message: "UploadResponse",
            reason: e.to_string(),
        })
    }
}

/// Link validity along three independent axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// A secret with this ID exists.
    pub exists: bool,
    /// The secret has not expired.
    pub time: bool,
    /// The view limit has not been reached.
    pub downloads: bool,
}

impl CheckResponse {
    /// All three checks passed.
    pub fn is_valid(&self) -> bool {
        self.exists && self.time && self.downloads
    }

    /// Decode from a JSON body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(bytes).map_err(|e| ProtocolError::Malformed {
            message: "CheckResponse",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_reads_upper_case_id() {
        let response =
            UploadResponse::from_json(br#"{"message": "Files uploaded successfully", "ID": "abc"}"#)
                .unwrap();

        assert_eq!(response.id, "abc");
        assert_eq!(response.message.as_deref(), Some("Files uploaded successfully"));
    }

    #[test]
    fn upload_response_without_id_is_malformed() {
        assert!(UploadResponse::from_json(br#"{"message": "ok"}"#).is_err());
    }

    #[test]
    fn check_response_validity() {
        let ok = CheckResponse::from_json(br#"{"exists": true, "time": true, "downloads": true}"#)
            .unwrap();
        assert!(ok.is_valid());

        let expired = CheckResponse { exists: true, time: false, downloads: true };
        assert!(!expired.is_valid());
    }
}
