//! Client configuration

use shared::DEFAULT_PAGE_SIZE;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Client configuration for connecting to the inventory backend
///
/// # Environment
///
/// | Variable                 | Default                     | Meaning                 |
/// |--------------------------|-----------------------------|-------------------------|
/// | STOCKROOM_API_URL        | http://localhost:8080/api   | backend base URL        |
/// | STOCKROOM_TIMEOUT_SECS   | 30                          | request timeout         |
/// | STOCKROOM_PAGE_SIZE      | 10                          | products per page       |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL; resource paths are appended to it
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Products per page
    pub page_size: u32,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("STOCKROOM_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            timeout: std::env::var("STOCKROOM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            page_size: std::env::var("STOCKROOM_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &u32| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the page size (minimum 1)
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::from_config(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
