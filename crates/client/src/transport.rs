//! The network seam under [`ApiClient`](crate::ApiClient).

use async_trait::async_trait;
use courtside_shared::ApiError;

/// A fully built GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a GET. Implementations report connection-level failures as
/// [`ApiError::Network`] and return every HTTP status as a response.
///
/// Futures are not `Send`: everything runs on the UI thread.
#[async_trait(?Send)]
pub trait Transport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(timeout: std::time::Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// The browser owns timeouts on web; the argument is accepted for symmetry.
    #[cfg(target_arch = "wasm32")]
    pub fn new(_timeout: std::time::Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut rb = self.client.get(&request.url);
        for (name, value) in &request.headers {
            rb = rb.header(name.as_str(), value.as_str());
        }

        let resp = rb.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}
