//! Authentication types for the AudiencePlayer API client.
//!
//! # Overview
//!
//! - [`Scope`]: which GraphQL endpoint (admin or user) an operation targets
//! - [`AgentKind`]: on whose behalf an operation is authorized
//! - [`BearerTokens`]: the per-agent token store held by an [`ApiClient`]
//! - [`decode_token_component`] and [`validate_token_expiry`]: local token inspection
//! - [`UserTokenRequest`] and [`UserAuthentication`]: input and outcome of the
//!   user token renewal flow
//!
//! Token renewal itself lives on [`ApiClient`], since it dispatches
//! authentication mutations.
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::auth::{validate_token_expiry, Scope};
//!
//! // A malformed token is never valid
//! assert!(!validate_token_expiry("garbage", Some(Scope::User.as_str()), 60));
//! ```
//!
//! [`ApiClient`]: crate::ApiClient

mod renewal;
mod scopes;
mod token;

pub use renewal::{UserAuthentication, UserTokenRequest};
pub use scopes::{AgentKind, Scope, UnknownScopeError};
pub use token::{
    decode_token_component, validate_token_expiry, validate_token_expiry_at, BearerTokens,
    TokenClaims, TokenComponent, DEFAULT_MINIMUM_TTL,
};
