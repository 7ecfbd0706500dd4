//! GraphQL argument encoding.
//!
//! An [`Argument`] is a closed set of value shapes the encoder knows how to
//! render inline into a GraphQL document. Native Rust values and loose JSON
//! convert into it through `From` impls and [`Argument::infer`]; an explicit
//! type name (see [`Argument::typed`]) always wins over inference.
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::graphql::{encode_arguments, Argument, Arguments};
//!
//! let mut arguments = Arguments::new();
//! arguments.insert("id".to_string(), Argument::from(5));
//! arguments.insert("title".to_string(), Argument::from(r#"say "hi""#));
//! arguments.insert("status".to_string(), Argument::Enum("active".to_string()));
//!
//! assert_eq!(
//!     encode_arguments(&arguments, true),
//!     r#"(id:5,title:"say \"hi\"",status:active)"#
//! );
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

/// Insertion-ordered argument set, keyed by argument name.
pub type Arguments = IndexMap<String, Argument>;

/// A single GraphQL argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    /// Rendered double-quoted, with `"` escaped as `\"`.
    String(String),
    /// Rendered as `true` or `false`.
    Boolean(bool),
    /// Rendered as `null`.
    Null,
    /// Rendered as `[a,b,...]`, each element encoded on its own.
    Array(Vec<Argument>),
    /// Rendered verbatim; an enum literal such as `desc`.
    Enum(String),
    /// Rendered verbatim; numbers and pre-formatted object literals.
    Raw(String),
}

impl Argument {
    /// Maps a loose JSON value onto an argument by its runtime shape.
    ///
    /// Strings stay strings, numbers render bare, arrays are inferred element
    /// by element. An object carrying a `type` key is an explicit descriptor
    /// and goes through [`Argument::typed`] with its `value` entry (or the
    /// whole object when `value` is absent). An object with a `value` but no
    /// `type` is typed as `array`, so a list value is encoded as an array and
    /// anything else passes through verbatim. Any other object is treated as
    /// a list of its values.
    #[must_use]
    pub fn infer(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Boolean(flag),
            Value::Number(number) => Self::Raw(number.to_string()),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::infer).collect()),
            Value::Object(mut map) => {
                let type_name = map.get("type").and_then(Value::as_str).map(str::to_string);
                match type_name {
                    Some(type_name) => {
                        let inner = map.remove("value").unwrap_or(Value::Object(map));
                        Self::typed(&type_name, inner)
                    }
                    None => match map.remove("value") {
                        Some(inner) => Self::typed("array", inner),
                        None => Self::Array(map.into_iter().map(|(_, v)| Self::infer(v)).collect()),
                    },
                }
            }
        }
    }

    /// Builds an argument from an explicit type name and a loose value.
    ///
    /// Type names are matched case-insensitively: `string`, `boolean`/`bool`,
    /// `null`, `array` and `enum`. Any other name produces a [`Argument::Raw`]
    /// rendered verbatim. A non-list value typed as `array` is assumed to be
    /// pre-formatted and passes through unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use audienceplayer::graphql::Argument;
    /// use serde_json::json;
    ///
    /// assert_eq!(Argument::typed("bool", json!("FALSE")), Argument::Boolean(false));
    /// assert_eq!(Argument::typed("enum", json!("asc")), Argument::Enum("asc".into()));
    /// assert_eq!(Argument::typed("array", json!("[1,2]")), Argument::Raw("[1,2]".into()));
    /// ```
    #[must_use]
    pub fn typed(type_name: &str, value: Value) -> Self {
        match type_name.to_ascii_lowercase().as_str() {
            "string" => Self::String(stringify(&value)),
            "boolean" | "bool" => Self::Boolean(coerce_bool(&value)),
            "null" => Self::Null,
            "array" => match value {
                Value::Array(items) => Self::Array(items.into_iter().map(Self::infer).collect()),
                other => Self::Raw(stringify(&other)),
            },
            "enum" => Self::Enum(stringify(&value)),
            _ => Self::Raw(stringify(&value)),
        }
    }

    /// Renders this value without a key.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::String(text) => format!("\"{}\"", escape_string(text)),
            Self::Boolean(flag) => flag.to_string(),
            Self::Null => "null".to_string(),
            Self::Array(items) => {
                let encoded: Vec<String> = items.iter().map(Self::encode).collect();
                format!("[{}]", encoded.join(","))
            }
            Self::Enum(value) | Self::Raw(value) => value.clone(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Escapes a string for inclusion in a double-quoted GraphQL literal.
///
/// Only `"` is escaped. Backslashes and control characters pass through
/// untouched, matching what the backend expects.
#[must_use]
pub fn escape_string(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Loose truthiness used when a value is explicitly typed as boolean.
///
/// For strings, a whole-string case-insensitive `false` counts as `"0"`, the
/// result is trimmed, and then `""` and `"0"` are false. Numbers are false
/// when zero, `null` is false, and lists and objects are false when empty.
#[must_use]
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => {
            let text = if text.eq_ignore_ascii_case("false") {
                "0"
            } else {
                text.trim()
            };
            !(text.is_empty() || text == "0")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

/// Encodes one argument as `key:value`, or just `value` when the key is
/// absent or empty.
#[must_use]
pub fn encode_argument(key: Option<&str>, argument: &Argument) -> String {
    match key {
        Some(key) if !key.is_empty() => format!("{key}:{}", argument.encode()),
        _ => argument.encode(),
    }
}

/// Encodes an argument set, comma-joined and wrapped in `(...)` when `wrap`
/// is set. An empty set encodes to an empty string either way.
#[must_use]
pub fn encode_arguments(arguments: &Arguments, wrap: bool) -> String {
    if arguments.is_empty() {
        return String::new();
    }
    let encoded: Vec<String> = arguments
        .iter()
        .map(|(key, argument)| encode_argument(Some(key.as_str()), argument))
        .collect();
    let joined = encoded.join(",");
    if wrap {
        format!("({joined})")
    } else {
        joined
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

macro_rules! numeric_argument {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Self::Raw(value.to_string())
                }
            }
        )*
    };
}

numeric_argument!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl<T: Into<Self>> From<Vec<T>> for Argument {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::infer(value)
    }
}
