//! Side-effects requested by the state machines.
//!
//! The runtime executes each action and feeds the outcome back as an event
//! carrying the same [`Ticket`].

use std::fmt;

use secret_core::LinkId;

use crate::Ticket;

/// Actions produced by the creation wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Redraw the wizard.
    Render,

    /// Seal the current bundle (encrypt, hash, assemble).
    Submit {
        /// Submission ticket.
        ticket: Ticket,
    },

    /// Upload the envelope sealed for this ticket.
    Upload {
        /// Submission ticket.
        ticket: Ticket,
    },
}

/// Actions produced by the open session.
#[derive(Clone, PartialEq, Eq)]
pub enum OpenAction {
    /// Redraw the open view.
    Render,

    /// Call the check endpoint.
    Check {
        /// Request ticket.
        ticket: Ticket,
        /// Link to check.
        id: LinkId,
    },

    /// Call the get endpoint.
    Fetch {
        /// Request ticket.
        ticket: Ticket,
        /// Link to fetch.
        id: LinkId,
    },

    /// Decrypt the fetched secret's items.
    Decrypt {
        /// Request ticket.
        ticket: Ticket,
        /// Verified password.
        password: String,
    },
}

impl fmt::Debug for OpenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render => f.write_str("Render"),
            Self::Check { ticket, id } => {
                f.debug_struct("Check").field("ticket", ticket).field("id", id).finish()
            },
            Self::Fetch { ticket, id } => {
                f.debug_struct("Fetch").field("ticket", ticket).field("id", id).finish()
            },
            Self::Decrypt { ticket, .. } => {
                f.debug_struct("Decrypt").field("ticket", ticket).finish_non_exhaustive()
            },
        }
    }
}
