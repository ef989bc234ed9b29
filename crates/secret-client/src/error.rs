//! Error types for the service boundary and both pipelines.

use secret_crypto::CryptoError;
use secret_proto::ProtocolError;
use thiserror::Error;

/// Errors talking to the secret service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached.
    #[error("service unavailable: {reason}")]
    Unavailable {
        /// Transport failure description
        reason: String,
    },

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Request or response body could not be (de)serialized.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The configured service is not compiled into this build.
    #[error("{service} service requires the `{feature}` feature")]
    Unsupported {
        /// Requested service
        service: &'static str,
        /// Cargo feature that enables it
        feature: &'static str,
    },
}

impl ServiceError {
    /// Returns true if the request never got a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Errors from the submission pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Bundle has no items.
    #[error("bundle is empty")]
    EmptyBundle,

    /// Password is empty after trimming.
    #[error("a password is required")]
    MissingPassword,

    /// An item could not be sealed.
    #[error("failed to encrypt {name:?}: {source}")]
    Seal {
        /// Item name
        name: String,
        /// Underlying failure
        source: CryptoError,
    },

    /// Upload failed at the transport or service level.
    #[error("upload failed: {reason}")]
    UploadFailed {
        /// Failure description
        reason: String,
    },

    /// The blocking sealing task did not complete.
    #[error("sealing task failed: {reason}")]
    Task {
        /// Join error description
        reason: String,
    },
}

impl SubmitError {
    /// Returns true if the failure happened while sealing, before any upload.
    pub fn is_seal_failure(&self) -> bool {
        matches!(self, Self::Seal { .. } | Self::Task { .. })
    }
}

/// Errors unlocking a fetched secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    /// Candidate password was empty.
    #[error("enter a password")]
    EmptyPassword,

    /// Candidate password does not match the stored hash.
    #[error("incorrect password")]
    IncorrectPassword,

    /// An item failed to decrypt with the verified password.
    #[error("failed to decrypt {name:?}: {reason}")]
    DecryptionFailed {
        /// Item name
        name: String,
        /// Failure description
        reason: String,
    },

    /// The blocking decryption task did not complete.
    #[error("decryption task failed: {reason}")]
    Task {
        /// Join error description
        reason: String,
    },
}

impl OpenError {
    /// Returns true if the user can retry with a different password.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmptyPassword | Self::IncorrectPassword)
    }
}
