//! HTTP secret service.
//!
//! A thin layer over `reqwest`: bodies are encoded and decoded with the
//! `secret-proto` types, and non-success statuses become
//! [`ServiceError::Status`]. A 404 from the get endpoint means "no secret".

use reqwest::{Client, StatusCode, Url, header::CONTENT_TYPE};
use secret_proto::{CheckResponse, SecretEnvelope, UploadResponse};

use super::SecretService;
use crate::ServiceError;

/// Remote service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
    api_base_url: Url,
}

impl HttpService {
    /// Create a service rooted at `api_base_url` (for example
    /// `http://localhost:8000/api`).
    pub fn new(api_base_url: &str) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Unavailable { reason: e.to_string() })?;

        let api_base_url = Url::parse(api_base_url).map_err(|e| ServiceError::Unavailable {
            reason: format!("invalid api url {api_base_url:?}: {e}"),
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(ServiceError::Unavailable {
                reason: format!("api url {api_base_url} cannot carry a path"),
            });
        }

        Ok(Self { client, api_base_url })
    }

    /// Endpoint URL with `segments` appended to the base path.
    ///
    /// Each segment is percent-encoded, so an identifier can never add path
    /// components, a query or a fragment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ServiceError> {
        let response =
            request.send().await.map_err(|e| ServiceError::Unavailable { reason: e.to_string() })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Unavailable { reason: e.to_string() })?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

impl SecretService for HttpService {
    async fn upload(&self, envelope: &SecretEnvelope) -> Result<UploadResponse, ServiceError> {
        let body = envelope.to_json()?;
        let request = self
            .client
            .post(self.endpoint(&["upload"]))
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let bytes = self.send(request).await?;
        Ok(UploadResponse::from_json(&bytes)?)
    }

    async fn check(&self, id: &str) -> Result<CheckResponse, ServiceError> {
        let bytes = self.send(self.client.get(self.endpoint(&["check", id]))).await?;
        Ok(CheckResponse::from_json(&bytes)?)
    }

    async fn get(&self, id: &str) -> Result<Option<SecretEnvelope>, ServiceError> {
        match self.send(self.client.get(self.endpoint(&["get", id]))).await {
            Ok(bytes) => Ok(Some(SecretEnvelope::from_json(&bytes)?)),
            Err(ServiceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base() {
        let service = HttpService::new("http://localhost:8000/api/").unwrap();
        assert_eq!(
            service.endpoint(&["check", "abc"]).as_str(),
            "http://localhost:8000/api/check/abc"
        );

        let service = HttpService::new("http://localhost:8000/api").unwrap();
        assert_eq!(service.endpoint(&["upload"]).as_str(), "http://localhost:8000/api/upload");
    }

    #[test]
    fn endpoint_escapes_identifier() {
        let service = HttpService::new("http://localhost:8000/api").unwrap();

        let url = service.endpoint(&["check", "../upload"]);
        assert_eq!(url.path(), "/api/check/..%2Fupload");

        let url = service.endpoint(&["get", "abc?x=1#frag"]);
        assert_eq!(url.path(), "/api/get/abc%3Fx=1%23frag");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(HttpService::new("not a url").is_err());
        assert!(HttpService::new("mailto:api@example.com").is_err());
    }
}
