//! HTTP-specific error types.
//!
//! Transport errors never reach callers of [`ApiClient`](crate::ApiClient)
//! directly: the client converts them into a dispatch error record inside
//! the returned [`ApiResponse`](crate::ApiResponse). They surface only when a
//! [`Transport`](crate::clients::Transport) is used on its own, or when an
//! [`HttpTransport`](crate::clients::HttpTransport) cannot be constructed.
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::clients::InvalidHttpRequestError;
//!
//! let error = InvalidHttpRequestError::MissingBody {
//!     method: "post".to_string(),
//! };
//! assert_eq!(error.to_string(), "Cannot use post without specifying data.");
//! ```

use thiserror::Error;

/// Error returned when an HTTP request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET request was built with a body.
    #[error("Cannot send a body with {method}; use query parameters instead.")]
    UnexpectedBody {
        /// The HTTP method that forbids a body.
        method: String,
    },

    /// The target URL is empty.
    #[error("Cannot send a request without a URL.")]
    MissingUrl,
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network, TLS, timeout or body-read failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
