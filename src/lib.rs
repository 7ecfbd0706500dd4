//! # AudiencePlayer API Rust Client
//!
//! A Rust client for the AudiencePlayer GraphQL API, providing type-safe
//! configuration, bearer token handling and an operation builder that
//! assembles inline GraphQL documents.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ApiConfig`] and [`ApiConfigBuilder`]
//! - Validated newtypes for OAuth credentials, project id and API URL
//! - An encoder for GraphQL arguments and selection sets ([`graphql`])
//! - A consumable [`Operation`] builder with pagination, search and sorting
//! - Named queries and mutations of the AudiencePlayer API ([`operations`])
//! - A uniform [`ApiResponse`] for every call, success or failure
//! - Local bearer token inspection and renewal flows ([`auth`])
//! - An async HTTP transport behind the [`clients::Transport`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use audienceplayer::{ApiConfig, ApiBaseUrl, ClientId, ClientSecret, ProjectId};
//!
//! let config = ApiConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .project_id(ProjectId::new(1).unwrap())
//!     .api_base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Executing Operations
//!
//! ```rust,ignore
//! use audienceplayer::ApiClient;
//! use audienceplayer::auth::UserTokenRequest;
//! use audienceplayer::operations::queries;
//!
//! let mut client = ApiClient::new(config)?;
//!
//! // Authenticate (or auto-register) a user on behalf of the OAuth client
//! let auth = client
//!     .validated_or_renewed_user_token(
//!         UserTokenRequest::new().user_id(42).user_email("viewer@example.com"),
//!     )
//!     .await;
//!
//! // Run a named query as that user
//! let response = queries::user_subscription_list()
//!     .paginate(10, 0)
//!     .execute(&client)
//!     .await;
//!
//! if response.is_successful() {
//!     println!("{:?}", response.data_flattened());
//! } else {
//!     println!("failed with {:?}", response.first_error_code());
//! }
//! ```
//!
//! ## Building Custom Operations
//!
//! ```rust
//! use audienceplayer::{Operation, Property};
//!
//! let operation = Operation::query("ArticleList")
//!     .list(true)
//!     .search("night")
//!     .sort("name", "asc")
//!     .properties([Property::from("id"), Property::nested("images", ["url"])]);
//!
//! assert_eq!(
//!     operation.document().unwrap(),
//!     "query{ArticleList(search:\"night\",sort_by:[{field:\"name\",direction:asc}])\
//!      {items{id,images{url}}}}"
//! );
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and tokens belong to an explicit [`ApiClient`]
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Uniform results**: request-path failures become error records in [`ApiResponse`]
//! - **Thread-safe**: configuration and the default client are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio async runtime

pub mod auth;
mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod graphql;
pub mod operations;

// Re-export public types at crate root for convenience
pub use auth::{AgentKind, BearerTokens, Scope, UserAuthentication, UserTokenRequest};
pub use client::{ApiClient, RawCall};
pub use config::{
    ApiBaseUrl, ApiConfig, ApiConfigBuilder, ClientCredentials, ClientId, ClientSecret, ProjectId,
};
pub use error::{ConfigError, ErrorKind};
pub use graphql::{
    ApiResponse, Argument, Arguments, ErrorRecord, Operation, OperationType, Property,
    RawResponse, SortDirection,
};
