//! HTTP client for network-based API calls

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiErrorBody;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
///
/// Paths are relative to the client's base URL. Non-2xx answers become
/// [`ClientError::Api`], transport failures [`ClientError::Network`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<T>;

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    /// POST without a body; an empty response (204) yields `None`
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>>;

    /// PUT without a body; an empty response (204) yields `None`
    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>>;

    /// DELETE; any response body is ignored
    async fn delete(&self, path: &str) -> ClientResult<()>;
}

/// Network HTTP client backed by reqwest
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    /// Create a client with the default 30s timeout
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "sending request");
        self.client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
    }

    /// Send the request and turn a non-2xx answer into an error
    async fn execute(request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, "request failed");
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let error = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => ClientError::api(body.status, body.message),
            // Fall back to the transport status and raw body
            Err(_) => {
                let message = if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("Unknown error").to_string()
                } else {
                    text
                };
                ClientError::api(status.as_u16(), message)
            }
        };
        tracing::warn!(status = status.as_u16(), error = %error, "request rejected");
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        Self::decode_optional(response).await?.ok_or_else(|| {
            tracing::warn!(status = status.as_u16(), "expected a JSON body, got none");
            ClientError::InvalidResponse(format!("empty body with status {status}"))
        })
    }

    async fn decode_optional<T: DeserializeOwned>(response: Response) -> ClientResult<Option<T>> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<T> {
        let req = self.request(Method::GET, path).query(query);
        let response = Self::execute(req).await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::POST, path).json(body);
        let response = Self::execute(req).await?;
        Self::decode(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::PUT, path).json(body);
        let response = Self::execute(req).await?;
        Self::decode(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let response = Self::execute(self.request(Method::POST, path)).await?;
        Self::decode_optional(response).await
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let response = Self::execute(self.request(Method::PUT, path)).await?;
        Self::decode_optional(response).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        Self::execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}
