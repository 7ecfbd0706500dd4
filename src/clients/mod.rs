//! HTTP transport layer for the GraphQL endpoints.
//!
//! This module holds the pieces below [`ApiClient`](crate::ApiClient): the
//! request type, its validation errors and the [`Transport`] trait that
//! actually moves bytes.
//!
//! # Overview
//!
//! - [`Transport`]: async trait sending an [`HttpRequest`] and returning the body text
//! - [`HttpTransport`]: the reqwest-backed implementation
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpMethod`]: GET or POST
//! - [`HttpError`]: transport failures
//!
//! # Custom transports
//!
//! ```rust
//! use async_trait::async_trait;
//! use audienceplayer::clients::{HttpError, HttpRequest, Transport};
//!
//! struct Canned(&'static str);
//!
//! #[async_trait]
//! impl Transport for Canned {
//!     async fn dispatch(&self, _request: HttpRequest) -> Result<String, HttpError> {
//!         Ok(self.0.to_string())
//!     }
//! }
//! ```

mod errors;
mod http_request;
mod transport;

pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use transport::{HttpTransport, Transport, SDK_VERSION};
