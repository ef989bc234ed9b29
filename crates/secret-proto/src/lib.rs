//! Secret Service Protocol
//!
//! Wire types exchanged with the secret service. Everything is JSON with
//! camelCase field names; sealed item bytes travel as standard base64.
//!
//! # Endpoints
//!
//! | Endpoint | Request | Response |
//! |---|---|---|
//! | `POST /upload` | [`SecretEnvelope`] | [`UploadResponse`] |
//! | `GET /check/{id}` | - | [`CheckResponse`] |
//! | `GET /get/{id}` | - | [`SecretEnvelope`] |

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod envelope;
mod error;
mod kind;
mod responses;

pub mod b64;

pub use envelope::{SealedItem, SecretEnvelope, SecretMetadata, SecretSettings, SelectedColors};
pub use error::ProtocolError;
pub use kind::ItemKind;
pub use responses::{CheckResponse, UploadResponse};
