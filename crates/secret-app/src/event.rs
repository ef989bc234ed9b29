//! Completions fed back into the state machines.

use secret_client::{OpenError, ServiceError};
use secret_core::ContentItem;
use secret_proto::{CheckResponse, SecretEnvelope};

use crate::Ticket;

/// Pipeline completions for the creation wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Sealing finished; upload can start.
    Sealed {
        /// Submission ticket.
        ticket: Ticket,
    },

    /// Upload succeeded.
    Uploaded {
        /// Submission ticket.
        ticket: Ticket,
        /// Service-assigned ID.
        secret_id: String,
    },

    /// Any pipeline stage failed.
    SubmitFailed {
        /// Submission ticket.
        ticket: Ticket,
        /// Human-readable failure.
        reason: String,
    },
}

/// Request completions for the open session.
#[derive(Debug, Clone)]
pub enum OpenEvent {
    /// Check endpoint answered (or failed).
    Checked {
        /// Request ticket.
        ticket: Ticket,
        /// Check outcome.
        result: Result<CheckResponse, ServiceError>,
    },

    /// Get endpoint answered (or failed).
    Fetched {
        /// Request ticket.
        ticket: Ticket,
        /// Stored envelope, `None` if missing.
        result: Result<Option<SecretEnvelope>, ServiceError>,
    },

    /// Decryption finished.
    Decrypted {
        /// Request ticket.
        ticket: Ticket,
        /// Decrypted items.
        result: Result<Vec<ContentItem>, OpenError>,
    },
}
