//! Configuration types for the AudiencePlayer API client.
//!
//! # Overview
//!
//! - [`ApiConfig`]: all settings the client needs, immutable once built
//! - [`ApiConfigBuilder`]: builder for [`ApiConfig`]
//! - [`ClientId`], [`ClientSecret`], [`ProjectId`], [`ApiBaseUrl`]: validated newtypes
//! - [`ClientCredentials`]: the identifiers sent along with client-authorized operations
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::{ApiConfig, ApiBaseUrl, ClientId, ClientSecret, ProjectId};
//!
//! let config = ApiConfig::builder()
//!     .client_id(ClientId::new("my-client").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .project_id(ProjectId::new(1).unwrap())
//!     .api_base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
//!     .locale("nl")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.locale(), Some("nl"));
//! ```

mod newtypes;

pub use newtypes::{ApiBaseUrl, ClientId, ClientSecret, ProjectId};

use std::time::Duration;

use crate::auth::Scope;
use crate::error::ConfigError;
use crate::graphql::OperationType;

/// Default total request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the AudiencePlayer API client.
///
/// # Thread Safety
///
/// `ApiConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    project_id: ProjectId,
    api_base_url: ApiBaseUrl,
    locale: Option<String>,
    forwarded_for: Option<String>,
    user_agent_prefix: Option<String>,
    query_as_post: bool,
    mutation_as_post: bool,
    timeout: Duration,
    connect_timeout: Duration,
}

impl ApiConfig {
    /// Creates a new builder for constructing an `ApiConfig`.
    #[must_use]
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::new()
    }

    /// Returns the OAuth client id.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the project id.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the API base URL, without trailing slash.
    #[must_use]
    pub const fn api_base_url(&self) -> &ApiBaseUrl {
        &self.api_base_url
    }

    /// Returns the locale sent as `Accept-Language`, if any.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Returns the end-user IP address sent as `X-Forwarded-For`, if any.
    #[must_use]
    pub fn forwarded_for(&self) -> Option<&str> {
        self.forwarded_for.as_deref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the total request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns whether operations of the given type are sent as POST.
    ///
    /// When `false`, the document travels as a GET query parameter.
    #[must_use]
    pub const fn is_post_request(&self, operation_type: OperationType) -> bool {
        match operation_type {
            OperationType::Query => self.query_as_post,
            OperationType::Mutation => self.mutation_as_post,
        }
    }

    /// Returns the GraphQL endpoint for the given scope.
    ///
    /// # Example
    ///
    /// ```rust
    /// use audienceplayer::{ApiConfig, ApiBaseUrl, ClientId, ClientSecret, ProjectId, Scope};
    ///
    /// let config = ApiConfig::builder()
    ///     .client_id(ClientId::new("id").unwrap())
    ///     .client_secret(ClientSecret::new("secret").unwrap())
    ///     .project_id(ProjectId::new(7).unwrap())
    ///     .api_base_url(ApiBaseUrl::new("https://api.example.com/").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.api_url(Scope::Admin), "https://api.example.com/graphql/7/admin");
    /// assert_eq!(config.api_url(Scope::User), "https://api.example.com/graphql/7/user");
    /// ```
    #[must_use]
    pub fn api_url(&self, scope: Scope) -> String {
        format!(
            "{}/graphql/{}/{}",
            self.api_base_url.as_ref(),
            self.project_id,
            scope.path_segment()
        )
    }
}

// Verify ApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiConfig>();
};

/// Builder for constructing [`ApiConfig`] instances.
///
/// Required fields are `client_id`, `client_secret`, `project_id` and
/// `api_base_url`.
///
/// # Defaults
///
/// - `locale`: `None`
/// - `forwarded_for`: `None`
/// - `user_agent_prefix`: `None`
/// - `query_as_post` / `mutation_as_post`: `true`
/// - `timeout`: 60 seconds
/// - `connect_timeout`: 30 seconds
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    project_id: Option<ProjectId>,
    api_base_url: Option<ApiBaseUrl>,
    locale: Option<String>,
    forwarded_for: Option<String>,
    user_agent_prefix: Option<String>,
    query_as_post: Option<bool>,
    mutation_as_post: Option<bool>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth client id (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the OAuth client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the project id (required).
    #[must_use]
    pub const fn project_id(mut self, id: ProjectId) -> Self {
        self.project_id = Some(id);
        self
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn api_base_url(mut self, url: ApiBaseUrl) -> Self {
        self.api_base_url = Some(url);
        self
    }

    /// Sets the locale. Surrounding whitespace is trimmed; a blank value
    /// clears it.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = non_blank(locale.into());
        self
    }

    /// Sets the end-user IP address forwarded to the backend.
    #[must_use]
    pub fn forwarded_for(mut self, ip_address: impl Into<String>) -> Self {
        self.forwarded_for = non_blank(ip_address.into());
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets whether queries are sent as POST (default) or GET.
    #[must_use]
    pub const fn query_as_post(mut self, as_post: bool) -> Self {
        self.query_as_post = Some(as_post);
        self
    }

    /// Sets whether mutations are sent as POST (default) or GET.
    #[must_use]
    pub const fn mutation_as_post(mut self, as_post: bool) -> Self {
        self.mutation_as_post = Some(as_post);
        self
    }

    /// Sets the total request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the [`ApiConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if any of the required
    /// fields is not set.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self.client_secret.ok_or(ConfigError::MissingRequiredField {
            field: "client_secret",
        })?;
        let project_id = self
            .project_id
            .ok_or(ConfigError::MissingRequiredField { field: "project_id" })?;
        let api_base_url = self.api_base_url.ok_or(ConfigError::MissingRequiredField {
            field: "api_base_url",
        })?;

        Ok(ApiConfig {
            client_id,
            client_secret,
            project_id,
            api_base_url,
            locale: self.locale,
            forwarded_for: self.forwarded_for,
            user_agent_prefix: self.user_agent_prefix,
            query_as_post: self.query_as_post.unwrap_or(true),
            mutation_as_post: self.mutation_as_post.unwrap_or(true),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Project and OAuth client identifiers sent with client-authorized operations.
///
/// Named operations accept `impl Into<ClientCredentials>`: pass `&ApiConfig`
/// to use the configured values, or build one explicitly to act on behalf of
/// another client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCredentials {
    /// Project the operation targets.
    pub project_id: ProjectId,
    /// OAuth client id.
    pub client_id: ClientId,
    /// OAuth client secret.
    pub client_secret: ClientSecret,
}

impl ClientCredentials {
    /// Creates explicit credentials.
    #[must_use]
    pub const fn new(project_id: ProjectId, client_id: ClientId, client_secret: ClientSecret) -> Self {
        Self {
            project_id,
            client_id,
            client_secret,
        }
    }
}

impl From<&ApiConfig> for ClientCredentials {
    fn from(config: &ApiConfig) -> Self {
        Self {
            project_id: config.project_id,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }
}
