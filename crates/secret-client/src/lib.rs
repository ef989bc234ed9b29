//! Secret Client
//!
//! Everything between a finished [`Bundle`](secret_core::Bundle) and the
//! remote service, in both directions.
//!
//! # Architecture
//!
//! ```text
//!  create:  Bundle ──► seal items ──► hash password ──► assemble ──► upload ──► ID
//!  open:    ID ──► check ──► get ──► verify password ──► open items ──► ContentItems
//! ```
//!
//! The sealing and unlocking stages are pure functions over
//! [`Environment`](secret_core::Environment)-supplied randomness. The service
//! boundary is the [`SecretService`] trait, with an in-memory
//! [`MockService`] and, behind the `transport` feature, an HTTP
//! implementation.
//!
//! # Components
//!
//! - [`pipeline`]: submission stages (seal, hash, assemble, transmit)
//! - [`unlock`]: password verification and item decryption
//! - [`SecretService`]: upload/check/get boundary
//! - [`AnyService`]: service selected from [`ServiceKind`](secret_core::ServiceKind)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;

pub mod pipeline;
pub mod service;
pub mod unlock;

pub use error::{OpenError, ServiceError, SubmitError};
#[cfg(feature = "transport")]
pub use service::HttpService;
pub use service::{AnyService, MockService, SecretService};
