//! The secret service boundary.
//!
//! Three operations, mirroring the remote API: upload a sealed envelope,
//! check a link's validity, and fetch the stored envelope. Implementations
//! share state internally, so a service can be cloned into tasks.

#[cfg(feature = "transport")]
mod http;
mod mock;

use std::future::Future;

#[cfg(feature = "transport")]
pub use http::HttpService;
pub use mock::MockService;
use secret_core::{Environment, ServiceKind};
use secret_proto::{CheckResponse, SecretEnvelope, UploadResponse};

use crate::ServiceError;

/// Upload, check and get operations of the secret service.
pub trait SecretService: Send + Sync + 'static {
    /// Store a sealed envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or rejects the
    /// envelope.
    fn upload(
        &self,
        envelope: &SecretEnvelope,
    ) -> impl Future<Output = Result<UploadResponse, ServiceError>> + Send;

    /// Validity of the secret with this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or the response is
    /// malformed.
    fn check(&self, id: &str) -> impl Future<Output = Result<CheckResponse, ServiceError>> + Send;

    /// The stored envelope. `None` if no secret has this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or the response is
    /// malformed.
    fn get(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<SecretEnvelope>, ServiceError>> + Send;
}

/// Service chosen at startup from [`ServiceKind`].
#[derive(Clone)]
pub enum AnyService<E: Environment> {
    /// In-memory service.
    Mock(MockService<E>),
    /// Remote HTTP service.
    #[cfg(feature = "transport")]
    Http(HttpService),
}

impl<E: Environment> AnyService<E> {
    /// Build the service described by `kind`.
    ///
    /// # Errors
    ///
    /// - `Unsupported` if `kind` is HTTP and the `transport` feature is off
    /// - `Unavailable` if the HTTP client cannot be constructed
    pub fn from_kind(kind: &ServiceKind, env: E) -> Result<Self, ServiceError> {
        match kind {
            ServiceKind::Mock => Ok(Self::Mock(MockService::new(env))),
            #[cfg(feature = "transport")]
            ServiceKind::Http { api_base_url } => Ok(Self::Http(HttpService::new(api_base_url)?)),
            #[cfg(not(feature = "transport"))]
            ServiceKind::Http { .. } => {
                Err(ServiceError::Unsupported { service: "http", feature: "transport" })
            },
        }
    }
}

impl<E: Environment> SecretService for AnyService<E> {
    async fn upload(&self, envelope: &SecretEnvelope) -> Result<UploadResponse, ServiceError> {
        match self {
            Self::Mock(service) => service.upload(envelope).await,
            #[cfg(feature = "transport")]
            Self::Http(service) => service.upload(envelope).await,
        }
    }

    async fn check(&self, id: &str) -> Result<CheckResponse, ServiceError> {
        match self {
            Self::Mock(service) => service.check(id).await,
            #[cfg(feature = "transport")]
            Self::Http(service) => service.check(id).await,
        }
    }

    async fn get(&self, id: &str) -> Result<Option<SecretEnvelope>, ServiceError> {
        match self {
            Self::Mock(service) => service.get(id).await,
            #[cfg(feature = "transport")]
            Self::Http(service) => service.get(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use secret_core::SeededEnv;

    use super::*;

    #[test]
    fn mock_kind_builds_mock_service() {
        let service = AnyService::from_kind(&ServiceKind::Mock, SeededEnv::with_seed(0));
        assert!(matches!(service, Ok(AnyService::Mock(_))));
    }

    #[cfg(not(feature = "transport"))]
    #[test]
    fn http_kind_requires_transport_feature() {
        let kind = ServiceKind::Http { api_base_url: "http://localhost:8000/api".into() };
        let service = AnyService::from_kind(&kind, SeededEnv::with_seed(0));
        assert!(matches!(service, Err(ServiceError::Unsupported { .. })));
    }
}
