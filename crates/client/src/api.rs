//! HTTP client for the signature API.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;
use uuid::Uuid;
use vible_core::wire::{
    CountResponse, ErrorResponse, HealthResponse, OverviewResponse, SESSION_ID_HEADER,
    SubmitResponse,
};
use vible_core::{PublicSignature, SignatureDraft};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("vible-client/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when talking to the signature API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body was not what the API promises.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The operations the signature form needs from the API.
pub trait SignatureApi: Send + Sync {
    /// `GET /signatures/count`
    fn count(&self) -> impl Future<Output = Result<usize, ClientError>> + Send;

    /// `GET /signatures/recent?limit=N`
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PublicSignature>, ClientError>> + Send;

    /// `POST /signatures`
    fn submit(
        &self,
        draft: &SignatureDraft,
    ) -> impl Future<Output = Result<SubmitResponse, ClientError>> + Send;
}

/// Signature API client.
///
/// Each client carries one random session ID, sent as `x-session-id` on
/// every request.
#[derive(Debug, Clone)]
pub struct SignatureClient {
    client: reqwest::Client,
    base_url: Url,
    session_id: Uuid,
}

impl SignatureClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let session_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            SESSION_ID_HEADER,
            HeaderValue::from_str(&session_id.to_string())
                .map_err(|e| ClientError::Decode(format!("Invalid session ID: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /health`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service is unhealthy.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json(self.endpoint("health")?).await
    }

    /// `GET /signatures`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn overview(&self) -> Result<OverviewResponse, ClientError> {
        self.get_json(self.endpoint("signatures")?).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

impl SignatureApi for SignatureClient {
    async fn count(&self) -> Result<usize, ClientError> {
        let body: CountResponse = self.get_json(self.endpoint("signatures/count")?).await?;
        Ok(body.count)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<PublicSignature>, ClientError> {
        let mut url = self.endpoint("signatures/recent")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn submit(&self, draft: &SignatureDraft) -> Result<SubmitResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint("signatures")?)
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }
}

/// Decode a success body, or turn an error body into [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body).map_or_else(
            |_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            },
            |e| e.error,
        );
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_prefix() {
        let client = SignatureClient::new("https://thevible.com/api").unwrap();
        assert_eq!(
            client.endpoint("signatures/count").unwrap().as_str(),
            "https://thevible.com/api/signatures/count"
        );

        let root = SignatureClient::new("http://127.0.0.1:3001").unwrap();
        assert_eq!(
            root.endpoint("signatures").unwrap().as_str(),
            "http://127.0.0.1:3001/signatures"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            SignatureClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_clients_get_distinct_sessions() {
        let a = SignatureClient::new("http://localhost:3001").unwrap();
        let b = SignatureClient::new("http://localhost:3001").unwrap();
        assert_ne!(a.session_id(), b.session_id());
        assert_eq!(a.clone().session_id(), a.session_id());
    }

    #[test]
    fn test_error_status() {
        let err = ClientError::Api {
            status: 409,
            message: "Duplicate signature detected".to_string(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(ClientError::Decode("x".to_string()).status(), None);
    }
}
