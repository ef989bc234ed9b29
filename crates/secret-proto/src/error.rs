//! Protocol error types.

use thiserror::Error;

/// Errors decoding or encoding wire messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Body was not valid JSON for the expected message.
    #[error("malformed {message}: {reason}")]
    Malformed {
        /// Message type that failed to decode
        message: &'static str,
        /// Decoder error
        reason: String,
    },

    /// Message could not be serialized.
    #[error("failed to encode {message}: {reason}")]
    Encode {
        /// Message type that failed to encode
        message: &'static str,
        /// Encoder error
        reason: String,
    },
}
