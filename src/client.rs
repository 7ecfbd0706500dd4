//! The AudiencePlayer API client.
//!
//! [`ApiClient`] ties configuration, bearer tokens and a [`Transport`]
//! together. Every call returns an [`ApiResponse`]; problems at any stage
//! (assembly, dispatch, parsing) are reported as error records inside it
//! rather than as `Err`.
//!
//! # Example
//!
//! ```rust,ignore
//! use audienceplayer::{ApiClient, ApiConfig, ApiBaseUrl, ClientId, ClientSecret, ProjectId};
//! use audienceplayer::operations::queries;
//!
//! let config = ApiConfig::builder()
//!     .client_id(ClientId::new("client").unwrap())
//!     .client_secret(ClientSecret::new("secret").unwrap())
//!     .project_id(ProjectId::new(1).unwrap())
//!     .api_base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
//!     .locale("nl")
//!     .build()?;
//!
//! let mut client = ApiClient::new(config)?;
//! client.validated_or_renewed_client_token(None, 60, true).await;
//!
//! let response = queries::article(12, None).execute(&client).await;
//! if response.is_successful() {
//!     println!("{}", response.data_flattened().unwrap());
//! }
//! ```

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::auth::{AgentKind, BearerTokens, Scope};
use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpTransport, Transport, SDK_VERSION};
use crate::config::ApiConfig;
use crate::error::ErrorKind;
use crate::graphql::{ApiResponse, Arguments, Operation, Property};
use crate::operations::{mutations, queries};

/// Properties requested by the user helpers when none are given.
const DEFAULT_USER_PROPERTIES: [&str; 2] = ["id", "email"];

/// Client for the AudiencePlayer GraphQL API.
///
/// The client owns its configuration and the bearer tokens of both agent
/// kinds. Token mutation goes through `&mut self`; executing operations only
/// needs `&self`.
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync` whenever its transport is.
#[derive(Debug)]
pub struct ApiClient<T: Transport = HttpTransport> {
    config: ApiConfig,
    transport: T,
    tokens: BearerTokens,
    default_headers: HashMap<String, String>,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient<HttpTransport> {
    /// Creates a client backed by [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be created.
    pub fn new(config: ApiConfig) -> Result<Self, HttpError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client sending requests through `transport`.
    #[must_use]
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        let default_headers = build_default_headers(&config);
        Self {
            config,
            transport,
            tokens: BearerTokens::new(),
            default_headers,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the headers sent with every request, before authorization.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the stored bearer tokens.
    #[must_use]
    pub const fn bearer_tokens(&self) -> &BearerTokens {
        &self.tokens
    }

    /// Returns the stored bearer token for `agent`.
    #[must_use]
    pub fn bearer_token(&self, agent: AgentKind) -> Option<&str> {
        self.tokens.get(agent)
    }

    /// Stores a bearer token for `agent` without validating it.
    /// An empty token clears the slot.
    pub fn set_bearer_token(&mut self, agent: AgentKind, token: impl Into<String>) {
        self.tokens.set(agent, token);
    }

    /// Assembles, sends and normalizes `operation`.
    ///
    /// The request is authorized with the stored token of the operation's
    /// agent kind, sent to the endpoint of its scope, and uses POST or GET as
    /// configured for its operation type.
    pub async fn execute(&self, operation: Operation) -> ApiResponse {
        let name = operation.name().to_string();

        let document = match operation.document() {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(operation = %name, %error, "Operation could not be assembled");
                return ApiResponse::error(&name, ErrorKind::Argument);
            }
        };
        tracing::debug!(operation = %name, %document, "Assembled GraphQL document");

        let call = RawCall::new(operation.endpoint_scope(), document)
            .operation_name(name)
            .agent(operation.agent_kind())
            .as_post(self.config.is_post_request(operation.operation_type()));

        self.execute_raw(call).await
    }

    /// Sends a caller-supplied document and normalizes the reply.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use audienceplayer::{RawCall, Scope};
    /// use serde_json::json;
    ///
    /// let call = RawCall::new(Scope::User, "query($id:Int){Article(id:$id){id,name}}")
    ///     .variables(json!({"id": 12}))
    ///     .operation_name("Article");
    ///
    /// let response = client.execute_raw(call).await;
    /// ```
    pub async fn execute_raw(&self, call: RawCall) -> ApiResponse {
        let token = call
            .bearer_token
            .as_deref()
            .or_else(|| self.tokens.get(call.agent));

        let request = match self.build_request(&call, token) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(operation = %call.operation_name, %error, "Request could not be built");
                return dispatch_failure(call);
            }
        };

        match self.transport.dispatch(request).await {
            Ok(body) => ApiResponse::parse(
                body,
                call.operation_name,
                call.document,
                call.variables,
            ),
            Err(error) => {
                tracing::warn!(operation = %call.operation_name, %error, "GraphQL dispatch failed");
                dispatch_failure(call)
            }
        }
    }

    fn build_request(
        &self,
        call: &RawCall,
        bearer_token: Option<&str>,
    ) -> Result<HttpRequest, HttpError> {
        let url = self.config.api_url(call.scope);
        let method = if call.as_post {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        };

        let mut builder = HttpRequest::builder(method, url).headers(self.default_headers.clone());
        if let Some(token) = bearer_token.filter(|t| !t.is_empty()) {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        builder = if call.as_post {
            let mut body = json!({ "query": call.document });
            if !call.variables.is_empty() {
                body["variables"] = Value::Object(call.variables.clone());
            }
            builder.body(body)
        } else {
            let mut builder =
                builder.query_param("query", Value::String(call.document.clone()).to_string());
            if !call.variables.is_empty() {
                builder = builder
                    .query_param("variables", Value::Object(call.variables.clone()).to_string());
            }
            builder
        };

        Ok(builder.build()?)
    }

    /// Looks a user up by id (or e-mail when `user_id` is zero) on behalf of
    /// the configured client.
    ///
    /// An empty `properties` requests `id,email`.
    pub async fn fetch_user(
        &self,
        user_id: u64,
        user_email: Option<&str>,
        properties: Vec<Property>,
    ) -> ApiResponse {
        let id = (user_id > 0).then_some(user_id);
        queries::client_user(&self.config, id, user_email)
            .properties(user_properties(properties))
            .execute(self)
            .await
    }

    /// Updates a user on behalf of the configured client.
    ///
    /// `update` is merged over the identifying arguments. An empty
    /// `properties` requests `id,email`.
    pub async fn update_user(
        &self,
        user_id: u64,
        update: Arguments,
        properties: Vec<Property>,
    ) -> ApiResponse {
        mutations::client_user_update(&self.config, user_id)
            .arguments(update)
            .properties(user_properties(properties))
            .execute(self)
            .await
    }

    /// Deletes a user on behalf of the configured client.
    pub async fn delete_user(&self, user_id: u64, user_email: &str) -> ApiResponse {
        mutations::client_user_delete(&self.config, user_id, user_email)
            .execute(self)
            .await
    }
}

/// A caller-supplied GraphQL call for [`ApiClient::execute_raw`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawCall {
    scope: Scope,
    document: String,
    variables: Map<String, Value>,
    as_post: bool,
    operation_name: String,
    bearer_token: Option<String>,
    agent: AgentKind,
}

impl RawCall {
    /// Creates a POST call against the `scope` endpoint, authorized with the
    /// stored user token.
    #[must_use]
    pub fn new(scope: Scope, document: impl Into<String>) -> Self {
        Self {
            scope,
            document: document.into(),
            variables: Map::new(),
            as_post: true,
            operation_name: String::new(),
            bearer_token: None,
            agent: AgentKind::User,
        }
    }

    /// Sets the variables. Anything but a JSON object clears them.
    #[must_use]
    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = match variables {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Chooses POST (`true`) or GET (`false`).
    #[must_use]
    pub const fn as_post(mut self, as_post: bool) -> Self {
        self.as_post = as_post;
        self
    }

    /// Sets the name used to flatten `data` and label error records.
    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = name.into();
        self
    }

    /// Authorizes with this token instead of a stored one.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Authorizes with the stored token of `agent`.
    #[must_use]
    pub const fn agent(mut self, agent: AgentKind) -> Self {
        self.agent = agent;
        self
    }
}

fn dispatch_failure(call: RawCall) -> ApiResponse {
    let body = ApiResponse::error_body(&call.operation_name, ErrorKind::Dispatch);
    ApiResponse::parse(body, call.operation_name, call.document, call.variables)
}

fn user_properties(properties: Vec<Property>) -> Vec<Property> {
    if properties.is_empty() {
        DEFAULT_USER_PROPERTIES.into_iter().map(Property::from).collect()
    } else {
        properties
    }
}

fn build_default_headers(config: &ApiConfig) -> HashMap<String, String> {
    let user_agent_prefix = config
        .user_agent_prefix()
        .map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    let user_agent =
        format!("{user_agent_prefix}AudiencePlayer API Client v{SDK_VERSION} | Rust {rust_version}");

    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("User-Agent".to_string(), user_agent);

    if let Some(locale) = config.locale() {
        headers.insert("Accept-Language".to_string(), locale.to_string());
    }
    if let Some(ip_address) = config.forwarded_for() {
        headers.insert("X-Forwarded-For".to_string(), ip_address.to_string());
    }

    headers
}
