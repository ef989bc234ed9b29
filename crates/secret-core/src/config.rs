//! Client configuration.
//!
//! Values are fixed at initialization; nothing here changes while a wizard
//! or open session is running.

use crate::settings::Appearance;

/// Default bundle size cap (1 GiB).
pub const DEFAULT_MAX_BUNDLE_BYTES: u64 = 1024 * 1024 * 1024;

/// Default base URL for share links (`{base}/{id}`).
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:8081";

/// Default base URL of the service API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Which service implementation handles upload/check/get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKind {
    /// In-process service that keeps secrets in memory.
    Mock,
    /// Remote HTTP service.
    Http {
        /// API base URL, e.g. `https://host/api`.
        api_base_url: String,
    },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct SecretConfig {
    /// Maximum total plaintext bytes per bundle.
    pub max_bundle_bytes: u64,
    /// Base URL share links are built from.
    pub share_base_url: String,
    /// Service selection.
    pub service: ServiceKind,
    /// Appearance used to pick default theme colors.
    pub appearance: Appearance,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            max_bundle_bytes: DEFAULT_MAX_BUNDLE_BYTES,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            service: ServiceKind::Http { api_base_url: DEFAULT_API_BASE_URL.to_string() },
            appearance: Appearance::Dark,
        }
    }
}

impl SecretConfig {
    /// Configuration backed by the in-memory mock service.
    pub fn mock() -> Self {
        Self { service: ServiceKind::Mock, ..Self::default() }
    }
}
