//! Secret Core
//!
//! The data model shared by the creation and open flows: the content bundle
//! and its mutation rules, creator settings, configuration, and the
//! environment abstraction that supplies time and randomness.
//!
//! # Components
//!
//! - [`Bundle`]: the in-progress secret (items, password, settings, result)
//! - [`ContentItem`]: one file, link or text entry
//! - [`Environment`]: clock and entropy, with [`SystemEnv`] and [`SeededEnv`]
//! - [`SecretConfig`]: size cap, share base URL and service selection
//!
//! # Invariants
//!
//! - `Bundle::total_bytes()` always equals the sum of its item sizes
//! - Item names are unique within a bundle
//! - `Bundle::total_bytes()` never exceeds the configured cap

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bundle;
pub mod config;
pub mod env;
pub mod error;
pub mod format;
pub mod link;
pub mod settings;

pub use bundle::{AddReport, Bundle, BundleSummary, ContentItem, RawFile};
pub use config::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_BUNDLE_BYTES, DEFAULT_SHARE_BASE_URL, SecretConfig,
    ServiceKind,
};
pub use env::{Environment, SeededEnv, SystemEnv};
pub use error::{BundleError, LinkError, SettingsError};
pub use link::{LinkId, share_link};
pub use secret_proto::ItemKind;
pub use settings::{Appearance, ColorSlot, ColorTheme, Expiration, ThemeColor};
