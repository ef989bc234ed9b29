//! Error types for the bundle model.
//!
//! Every variant here is recoverable: the bundle is left exactly as it was
//! before the failing call.

use thiserror::Error;

use crate::ItemKind;

/// Errors from bundle mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BundleError {
    /// An item with this name is already in the bundle.
    #[error("an item named {name:?} is already in the bundle")]
    DuplicateName {
        /// Colliding name
        name: String,
    },

    /// The addition would push the bundle over its size cap.
    #[error("bundle would hold {attempted} bytes, limit is {limit}")]
    SizeLimitExceeded {
        /// Total the bundle would have reached
        attempted: u64,
        /// Configured cap
        limit: u64,
    },

    /// Input failed validation (empty title, empty content, ...).
    #[error("{field} {reason}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Text entries must be links or text.
    #[error("{kind} items cannot be added as text")]
    InvalidKind {
        /// Rejected kind
        kind: ItemKind,
    },

    /// No item with this name.
    #[error("no item named {name:?}")]
    NotFound {
        /// Requested name
        name: String,
    },
}

impl BundleError {
    /// Returns true if this error is an input validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidKind { .. })
    }
}

/// Errors parsing creator settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Color is not `#RRGGBB`.
    #[error("invalid color {value:?}: use hex format like #RRGGBB")]
    InvalidColor {
        /// Rejected input
        value: String,
    },

    /// Appearance is neither light nor dark.
    #[error("unsupported appearance {value:?}: expected light or dark")]
    InvalidAppearance {
        /// Rejected input
        value: String,
    },

    /// Expiration is not one of the supported choices.
    #[error("unsupported expiration {value:?}: expected 1h, 1d or 1w")]
    InvalidExpiration {
        /// Rejected input
        value: String,
    },
}

/// Errors parsing a link identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Input was empty after trimming.
    #[error("link is empty")]
    Empty,

    /// URL could not be parsed or has no identifier segment.
    #[error("malformed link {input:?}: {reason}")]
    Malformed {
        /// Rejected input
        input: String,
        /// Parser error
        reason: String,
    },
}
