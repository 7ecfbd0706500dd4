//! The transport seam between the API client and the network.
//!
//! [`ApiClient`](crate::ApiClient) never talks to reqwest directly. It hands
//! a fully prepared [`HttpRequest`] to a [`Transport`] and gets the raw
//! response text back. [`HttpTransport`] is the production implementation;
//! tests and embedders may supply their own.

use async_trait::async_trait;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::config::ApiConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sends prepared requests and returns the response body.
///
/// Implementations return the body text for every response that arrives,
/// whatever its HTTP status: the GraphQL backend reports failures inside the
/// body, and the response normalizer decides what the text means. An `Err`
/// is reserved for requests that never produced a body at all.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request is invalid or the exchange fails
    /// at the network level.
    async fn dispatch(&self, request: HttpRequest) -> Result<String, HttpError>;
}

/// [`Transport`] backed by a reqwest client with rustls.
///
/// # Example
///
/// ```rust
/// use audienceplayer::{ApiConfig, ApiBaseUrl, ClientId, ClientSecret, ProjectId};
/// use audienceplayer::clients::HttpTransport;
///
/// let config = ApiConfig::builder()
///     .client_id(ClientId::new("client").unwrap())
///     .client_secret(ClientSecret::new("secret").unwrap())
///     .project_id(ProjectId::new(1).unwrap())
///     .api_base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
///     .build()
///     .unwrap();
///
/// let transport = HttpTransport::new(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

// Verify HttpTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpTransport>();
};

impl HttpTransport {
    /// Creates a transport using the timeouts from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying client cannot be
    /// created, which only happens when TLS initialization fails.
    pub fn new(config: &ApiConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: HttpRequest) -> Result<String, HttpError> {
        request.verify()?;

        let url = request.full_url();
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(method = %request.http_method, url = %request.url, "Dispatching GraphQL request");

        let res = req_builder.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %request.url,
                "GraphQL endpoint answered with a non-success status"
            );
        }

        Ok(body)
    }
}
