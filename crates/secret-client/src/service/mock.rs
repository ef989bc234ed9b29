//! In-memory secret service.
//!
//! Behaves like the remote service closely enough to drive both flows end to
//! end: uploads are validated and stored, checks evaluate expiry and view
//! counts against the environment clock, and every successful get counts as
//! a view.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{DateTime, Duration, Utc};
use secret_core::{Environment, ThemeColor};
use secret_proto::{CheckResponse, SecretEnvelope, UploadResponse};
use tokio::sync::Mutex;

use super::SecretService;
use crate::ServiceError;

struct StoredSecret {
    envelope: SecretEnvelope,
    stored_at: DateTime<Utc>,
    views: u32,
}

impl StoredSecret {
    fn within_time(&self, now: DateTime<Utc>) -> bool {
        let lifetime = i64::try_from(self.envelope.settings.expiration).unwrap_or(i64::MAX);
        let expires_at = Duration::try_seconds(lifetime)
            .and_then(|lifetime| self.stored_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        now < expires_at
    }

    fn within_view_limit(&self) -> bool {
        self.envelope.settings.view_limit.is_none_or(|limit| self.views < limit)
    }
}

/// In-memory service for tests and offline use.
///
/// Clones share the same store.
#[derive(Clone)]
pub struct MockService<E: Environment> {
    env: E,
    store: Arc<Mutex<HashMap<String, StoredSecret>>>,
    offline: Arc<AtomicBool>,
}

impl<E: Environment> MockService<E> {
    /// Create an empty service using `env` for IDs and the clock.
    pub fn new(env: E) -> Self {
        Self { env, store: Arc::default(), offline: Arc::default() }
    }

    /// Simulate the network going away. While offline every call fails with
    /// `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful gets for `id`. `None` if unknown.
    pub async fn views(&self, id: &str) -> Option<u32> {
        self.store.lock().await.get(id).map(|secret| secret.views)
    }

    /// Number of stored secrets.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// True if nothing has been uploaded.
    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    fn ensure_online(&self) -> Result<(), ServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable { reason: "mock service is offline".into() });
        }
        Ok(())
    }
}

fn validate_colors(envelope: &SecretEnvelope) -> Result<(), ServiceError> {
    let colors = &envelope.settings.selected_colors;
    for color in [&colors.foreground, &colors.background, &colors.accent] {
        if color.parse::<ThemeColor>().is_err() {
            return Err(ServiceError::Status {
                status: 422,
                body: "Invalid color format. Use hex format like #RRGGBB.".into(),
            });
        }
    }
    Ok(())
}

impl<E: Environment> SecretService for MockService<E> {
    async fn upload(&self, envelope: &SecretEnvelope) -> Result<UploadResponse, ServiceError> {
        self.ensure_online()?;
        validate_colors(envelope)?;

        let id = format!("mock-{:016x}", self.env.random_u64());
        let secret =
            StoredSecret { envelope: envelope.clone(), stored_at: self.env.now(), views: 0 };
        self.store.lock().await.insert(id.clone(), secret);

        tracing::debug!(%id, items = envelope.files.len(), "mock upload stored");
        Ok(UploadResponse { message: Some("Files uploaded successfully".into()), id })
    }

    async fn check(&self, id: &str) -> Result<CheckResponse, ServiceError> {
        self.ensure_online()?;

        let now = self.env.now();
        let store = self.store.lock().await;
        let response = match store.get(id) {
            Some(secret) => CheckResponse {
                exists: true,
                time: secret.within_time(now),
                downloads: secret.within_view_limit(),
            },
            None => CheckResponse { exists: false, time: false, downloads: false },
        };
        Ok(response)
    }

    async fn get(&self, id: &str) -> Result<Option<SecretEnvelope>, ServiceError> {
        self.ensure_online()?;

        let mut store = self.store.lock().await;
        let Some(secret) = store.get_mut(id) else {
            return Ok(None);
        };
        secret.views = secret.views.saturating_add(1);
        Ok(Some(secret.envelope.clone()))
    }
}
