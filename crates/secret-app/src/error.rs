//! Error types for the application layer.

use secret_core::{BundleError, LinkError};
use thiserror::Error;

use crate::WizardStep;

/// Errors from wizard edits and commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Field edited outside the step that owns it.
    #[error("{field} can only be changed on the {owner} step (current: {current})")]
    WrongStep {
        /// Edited field
        field: &'static str,
        /// Step that owns the field
        owner: WizardStep,
        /// Active step
        current: WizardStep,
    },

    /// Command is not available on the active step.
    #[error("{command} is not available on the {current} step")]
    Unavailable {
        /// Rejected command
        command: &'static str,
        /// Active step
        current: WizardStep,
    },

    /// Bundle rejected the edit.
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Errors from the runtime.
///
/// Generic over the driver's error type.
#[derive(Error, Debug)]
pub enum RuntimeError<E: std::error::Error + 'static> {
    /// Driver I/O failed.
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// Wizard rejected a command.
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// Link could not be parsed.
    #[error(transparent)]
    Link(#[from] LinkError),
}
