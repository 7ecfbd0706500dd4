//! Response normalization.
//!
//! Every call made through the client ends in an [`ApiResponse`], whatever
//! went wrong along the way. Local failures (assembly, dispatch, parsing)
//! are turned into a synthetic error record shaped exactly like the
//! backend's own errors, so callers only ever inspect one structure.
//!
//! # Normalization Rules
//!
//! 1. Empty input (or the literal `"0"`) is a parse error (5002).
//! 2. Text input is decoded as JSON; invalid JSON or `null` is a parse error.
//! 3. A decoded value without a `data` or `errors` key is a format error (5003).
//! 4. Otherwise `data` and `errors` are copied over and parsing succeeded.
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::ApiResponse;
//!
//! let response = ApiResponse::new(r#"{"data":{"UserDetails":{"id":1}}}"#);
//! assert!(response.is_successful());
//!
//! let response = ApiResponse::new("{{bad-json");
//! assert!(!response.is_successful());
//! assert_eq!(response.first_error_code(), Some(5002));
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ErrorKind;

/// The body handed to the normalizer.
#[derive(Clone, Debug, PartialEq)]
pub enum RawResponse {
    /// Undecoded response text.
    Text(String),
    /// An already-decoded JSON value.
    Json(Value),
}

impl From<&str> for RawResponse {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawResponse {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for RawResponse {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// One entry of a response's `errors` list.
///
/// Backend errors usually carry `message` and often `code`; any other keys
/// (such as `locations` or `path`) are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Operation that produced the error, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Human readable message.
    #[serde(default)]
    pub message: String,
    /// Numeric status code, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Any further keys of the error object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorRecord {
    /// Builds a record for a local failure.
    #[must_use]
    pub fn synthetic(operation: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            operation: Some(operation.into()),
            message: kind.message().to_string(),
            code: Some(i64::from(kind.code())),
            extra: Map::new(),
        }
    }

    /// Reads a record from one element of an `errors` list.
    ///
    /// Non-object elements become a record whose message is the element
    /// itself. Numeric strings are accepted as codes.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Self {
                    message: value_as_text(&other),
                    ..Self::default()
                }
            }
        };

        let operation = map
            .remove("operation")
            .and_then(|v| v.as_str().map(ToString::to_string));
        let message = map
            .remove("message")
            .map(|v| value_as_text(&v))
            .unwrap_or_default();
        let code = map.remove("code").and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        Self {
            operation,
            message,
            code,
            extra: map,
        }
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The normalized result of an API call.
///
/// Invariant: [`is_successful`](Self::is_successful) holds exactly when the
/// body was parsed and carries no errors.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    raw: RawResponse,
    parsed: Value,
    data: Option<Value>,
    errors: Vec<ErrorRecord>,
    is_data_parsed: bool,
    operation_name: String,
    operation_query: String,
    operation_variables: Map<String, Value>,
}

impl ApiResponse {
    /// Normalizes a body without operation context.
    #[must_use]
    pub fn new(raw: impl Into<RawResponse>) -> Self {
        Self::parse(raw, "", "", Map::new())
    }

    /// Normalizes a body, recording the operation that produced it.
    ///
    /// The operation name is used for [`data_flattened`](Self::data_flattened)
    /// and in synthetic error records; query and variables are kept for
    /// diagnostics only.
    #[must_use]
    pub fn parse(
        raw: impl Into<RawResponse>,
        operation_name: impl Into<String>,
        operation_query: impl Into<String>,
        operation_variables: Map<String, Value>,
    ) -> Self {
        let raw = raw.into();
        let operation_name = operation_name.into();

        let (parsed, is_data_parsed) = match decode(&raw) {
            None => (
                Self::error_body(&operation_name, ErrorKind::ResponseParse),
                false,
            ),
            Some(value) if !has_payload(&value) => (
                Self::error_body(&operation_name, ErrorKind::ResponseFormat),
                false,
            ),
            Some(value) => (value, true),
        };

        if !is_data_parsed {
            tracing::warn!(
                operation = %operation_name,
                "API response could not be normalized"
            );
        }

        let data = parsed.get("data").filter(|v| !v.is_null()).cloned();
        let errors = match parsed.get("errors") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().cloned().map(ErrorRecord::from_value).collect(),
            Some(other) => vec![ErrorRecord::from_value(other.clone())],
        };

        Self {
            raw,
            parsed,
            data,
            errors,
            is_data_parsed,
            operation_name,
            operation_query: operation_query.into(),
            operation_variables,
        }
    }

    /// Builds the response for a failure that happened before any body was
    /// received.
    ///
    /// # Example
    ///
    /// ```rust
    /// use audienceplayer::{ApiResponse, ErrorKind};
    ///
    /// let response = ApiResponse::error("UserDetails", ErrorKind::Dispatch);
    /// assert!(!response.is_successful());
    /// assert_eq!(response.first_error_code(), Some(5001));
    /// assert_eq!(response.errors()[0].operation.as_deref(), Some("UserDetails"));
    /// ```
    #[must_use]
    pub fn error(operation_name: &str, kind: ErrorKind) -> Self {
        Self::parse(
            Self::error_body(operation_name, kind),
            operation_name,
            "",
            Map::new(),
        )
    }

    /// Returns the JSON body used for synthetic error responses:
    /// `{"data": null, "errors": [{"operation", "message", "code"}]}`.
    #[must_use]
    pub fn error_body(operation_name: &str, kind: ErrorKind) -> Value {
        json!({
            "data": null,
            "errors": [{
                "operation": operation_name,
                "message": kind.message(),
                "code": kind.code(),
            }],
        })
    }

    /// Returns the `data` payload, if present and not null.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns `data[operation_name]` when that key exists, else `data`.
    #[must_use]
    pub fn data_flattened(&self) -> Option<&Value> {
        let data = self.data.as_ref()?;
        if self.operation_name.is_empty() {
            return Some(data);
        }
        Some(data.get(&self.operation_name).unwrap_or(data))
    }

    /// Deserializes the flattened payload.
    ///
    /// Missing data deserializes from `null`, so `Option<T>` targets yield
    /// `None` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload does not match `T`.
    pub fn data_flattened_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data_flattened().cloned().unwrap_or(Value::Null))
    }

    /// Returns the error records.
    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Returns `true` if any error record is present.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the code of the first error record, if any.
    #[must_use]
    pub fn first_error_code(&self) -> Option<i64> {
        self.errors.first().and_then(|error| error.code)
    }

    /// Returns `true` if the body decoded into a well-formed payload.
    #[must_use]
    pub const fn is_data_parsed(&self) -> bool {
        self.is_data_parsed
    }

    /// Returns `true` if the body was parsed and carries no errors.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.is_data_parsed && self.errors.is_empty()
    }

    /// Returns the body exactly as received.
    #[must_use]
    pub const fn raw(&self) -> &RawResponse {
        &self.raw
    }

    /// Returns the decoded body, or the synthetic error body on failure.
    #[must_use]
    pub const fn parsed(&self) -> &Value {
        &self.parsed
    }

    /// Returns the name of the operation that produced this response.
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Returns the document that was sent.
    #[must_use]
    pub fn operation_query(&self) -> &str {
        &self.operation_query
    }

    /// Returns the variables that were sent.
    #[must_use]
    pub const fn operation_variables(&self) -> &Map<String, Value> {
        &self.operation_variables
    }
}

fn decode(raw: &RawResponse) -> Option<Value> {
    match raw {
        RawResponse::Text(text) => {
            if text.is_empty() || text == "0" {
                return None;
            }
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Null) | Err(_) => None,
                Ok(value) => Some(value),
            }
        }
        RawResponse::Json(value) => {
            let empty = match value {
                Value::Null | Value::Bool(false) => true,
                Value::String(text) => text.is_empty() || text == "0",
                Value::Array(items) => items.is_empty(),
                Value::Number(number) => number.as_f64() == Some(0.0),
                Value::Bool(true) | Value::Object(_) => false,
            };
            if empty {
                None
            } else {
                Some(value.clone())
            }
        }
    }
}

fn has_payload(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("data") || map.contains_key("errors"))
}
