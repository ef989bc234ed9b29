//! Application layer for Secret
//!
//! Pure state machines for the two user flows plus a generic runtime that
//! executes their actions against a service and a platform driver.
//!
//! # Components
//!
//! - [`CreationWizard`]: step sequencing, guarded navigation and the owned
//!   [`Bundle`](secret_core::Bundle)
//! - [`OpenSession`]: check, fetch, unlock and view a shared secret
//! - [`Driver`]: trait for platform-specific I/O (files, rendering, links)
//! - [`Runtime`]: executes state machine actions using a driver and a
//!   [`SecretService`](secret_client::SecretService)
//!
//! # Stale completions
//!
//! Every asynchronous request carries a [`Ticket`]. Resetting the wizard or
//! opening another link invalidates outstanding tickets, and completions
//! that arrive with an old ticket are dropped.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod error;
mod event;
mod open;
mod runtime;
mod ticket;
mod wizard;

pub use action::{OpenAction, WizardAction};
pub use driver::{Driver, FileStat};
pub use error::{RuntimeError, WizardError};
pub use event::{OpenEvent, WizardEvent};
pub use open::{
    FAILED_TO_CHECK, FAILED_TO_DECRYPT, FAILED_TO_LOAD, InvalidReason, ItemDisposition,
    LoadingPhase, OpenSession, OpenState,
};
pub use runtime::Runtime;
pub use ticket::Ticket;
pub use wizard::{CreationWizard, SubmitStatus, WizardStep};
