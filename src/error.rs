//! Error types for the AudiencePlayer API client.
//!
//! Two kinds of failure exist in this crate:
//!
//! - [`ConfigError`]: returned eagerly (as `Err`) when configuration values
//!   fail validation. This is the only error the client ever returns directly.
//! - [`ErrorKind`]: the numeric status taxonomy carried inside an
//!   [`ApiResponse`](crate::ApiResponse) when an operation fails anywhere on
//!   the request path (assembly, dispatch, parsing).
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::InvalidClientId)));
//! assert_eq!(ConfigError::InvalidClientId.code(), 4002);
//! ```

use std::fmt;

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant maps to a distinct numeric status code via [`ConfigError::code`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing.
    #[error("Client configuration error, required field '{field}' was not set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// OAuth client id is empty.
    #[error("Client configuration error, incorrect value for argument \"client_id\". Please provide a non-empty OAuth client id.")]
    InvalidClientId,

    /// OAuth client secret is empty.
    #[error("Client configuration error, incorrect value for argument \"client_secret\". Please provide a non-empty OAuth client secret.")]
    InvalidClientSecret,

    /// Project id is not a positive number.
    #[error("Client configuration error, incorrect value for argument \"project_id\". Expected a positive number, got {project_id}.")]
    InvalidProjectId {
        /// The rejected project id.
        project_id: i64,
    },

    /// API base URL is malformed.
    #[error("Client configuration error, incorrect value for argument \"api_base_url\". '{url}' is not a valid URL (e.g., 'https://api.example.com').")]
    InvalidApiBaseUrl {
        /// The rejected URL.
        url: String,
    },
}

impl ConfigError {
    /// Returns the numeric status code for this error.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::MissingRequiredField { .. } => ErrorKind::Configuration.code(),
            Self::InvalidClientId => 4002,
            Self::InvalidClientSecret => 4003,
            Self::InvalidProjectId { .. } => 4004,
            Self::InvalidApiBaseUrl { .. } => 4005,
        }
    }
}

/// Status taxonomy for failures reported inside an API response.
///
/// These never surface as `Err`; the request path converts them into a
/// synthetic error record so callers always receive a uniform response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unclassified failure.
    General,
    /// The operation could not be assembled from its arguments.
    Argument,
    /// The client is missing configuration required for the call.
    Configuration,
    /// The transport failed to deliver the request or read the reply.
    Dispatch,
    /// The response body was empty or not valid JSON.
    ResponseParse,
    /// The response JSON carried neither `data` nor `errors`.
    ResponseFormat,
}

impl ErrorKind {
    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::General => -1,
            Self::Argument => 4000,
            Self::Configuration => 4001,
            Self::Dispatch => 5001,
            Self::ResponseParse => 5002,
            Self::ResponseFormat => 5003,
        }
    }

    /// Returns the human readable message placed in synthetic error records.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::General => "General error",
            Self::Argument => "User argument error, given query arguments could not be parsed",
            Self::Configuration => {
                "Client configuration error, required configuration arguments are were not properly hydrated"
            }
            Self::Dispatch => "Client dispatch execution error",
            Self::ResponseParse => "Api response error, response could not be parsed",
            Self::ResponseFormat => {
                "Api response error, expected properties data and/or errors not present"
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_codes_are_distinct() {
        let errors = [
            ConfigError::MissingRequiredField { field: "client_id" },
            ConfigError::InvalidClientId,
            ConfigError::InvalidClientSecret,
            ConfigError::InvalidProjectId { project_id: 0 },
            ConfigError::InvalidApiBaseUrl {
                url: "nope".to_string(),
            },
        ];
        let codes: Vec<i32> = errors.iter().map(ConfigError::code).collect();
        assert_eq!(codes, vec![4001, 4002, 4003, 4004, 4005]);
    }

    #[test]
    fn test_invalid_project_id_error_message() {
        let error = ConfigError::InvalidProjectId { project_id: -3 };
        let message = error.to_string();
        assert!(message.contains("project_id"));
        assert!(message.contains("-3"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField {
            field: "api_base_url",
        };
        assert!(error.to_string().contains("api_base_url"));
    }

    #[test]
    fn test_error_kind_codes() {
        assert_eq!(ErrorKind::General.code(), -1);
        assert_eq!(ErrorKind::Argument.code(), 4000);
        assert_eq!(ErrorKind::Configuration.code(), 4001);
        assert_eq!(ErrorKind::Dispatch.code(), 5001);
        assert_eq!(ErrorKind::ResponseParse.code(), 5002);
        assert_eq!(ErrorKind::ResponseFormat.code(), 5003);
    }

    #[test]
    fn test_error_kind_display_includes_code() {
        let display = ErrorKind::ResponseParse.to_string();
        assert!(display.contains("could not be parsed"));
        assert!(display.contains("5002"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::InvalidClientSecret;
        let _: &dyn std::error::Error = &error;
    }
}
