//! Command-line front end for Secret
//!
//! A thin shell over [`secret_app::Driver`] that reads files from disk,
//! writes decrypted items to a directory, and reports progress on a text
//! stream. All flow logic lives in the generic [`secret_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod terminal;

pub use command::{CliError, CreateOptions, create_secret, open_secret};
pub use terminal::{TerminalDriver, TerminalError};
