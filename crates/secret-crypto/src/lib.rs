//! Secret Cryptographic Primitives
//!
//! Building blocks for sealing the items of a secret bundle. Pure functions
//! with deterministic outputs: callers provide the nonce bytes, so tests can
//! pin them and production code draws them from the environment.
//!
//! # Item Lifecycle
//!
//! ```text
//! Password
//!    │
//!    ├──► pad/truncate ──► ItemKey (32 bytes)
//!    │                        │
//!    │                        ▼
//!    │           AES-256-GCM(nonce) ──► nonce ‖ ciphertext ‖ tag
//!    │
//!    └──► SHA-256 ──► base64 password hash (sent to the service)
//! ```
//!
//! # Security
//!
//! Key derivation is the fixed-length pad/truncate scheme used by every
//! secret already stored by the service. It is NOT a password-based KDF: low
//! entropy passwords produce low entropy keys. Replacing it changes the wire
//! contract and must ship as a new format version.
//!
//! - Every item is sealed under a fresh 12-byte nonce
//! - AES-GCM authenticates each item; a failed tag rejects the item
//! - The plaintext password never leaves the client, only its digest

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod derivation;
mod digest;
mod error;
mod seal;

pub use derivation::{ItemKey, KEY_PAD_BYTE, KEY_SIZE, derive_item_key};
pub use digest::{hash_password, password_digest, verify_password};
pub use error::CryptoError;
pub use seal::{NONCE_SIZE, TAG_SIZE, open_item, seal_item, sealed_len};
