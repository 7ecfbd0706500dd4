//! GraphQL document assembly.
//!
//! Combines an operation type, an operation name and encoded arguments and
//! properties into a single inline document:
//!
//! ```text
//! <type>{<name>(<arguments>){<properties>}}
//! ```
//!
//! The argument parentheses are omitted when there are no arguments, and the
//! property braces when there are no properties.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::graphql::argument::{encode_arguments, Arguments};
use crate::graphql::property::{encode_properties, Property};

/// The two GraphQL operation types the backend accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// A read operation.
    Query,
    /// A write operation.
    Mutation,
}

impl OperationType {
    /// Returns the GraphQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "mutation" => Ok(Self::Mutation),
            other => Err(AssemblyError::UnknownOperationType {
                value: other.to_string(),
            }),
        }
    }
}

/// Errors that prevent a document from being assembled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// The operation type is neither `query` nor `mutation`.
    #[error("Unknown operation type '{value}'. Expected 'query' or 'mutation'.")]
    UnknownOperationType {
        /// The rejected value.
        value: String,
    },

    /// The operation name is empty.
    #[error("Operation name cannot be empty.")]
    EmptyOperationName,

    /// The operation name is not a valid GraphQL name.
    #[error("Invalid operation name '{name}'. Expected letters, digits and underscores, not starting with a digit.")]
    InvalidOperationName {
        /// The rejected name.
        name: String,
    },
}

/// Assembles an inline GraphQL document.
///
/// # Errors
///
/// Returns [`AssemblyError`] if `name` is empty or not a valid GraphQL name.
///
/// # Example
///
/// ```rust
/// use audienceplayer::graphql::{assemble_document, Argument, Arguments, OperationType, Property};
///
/// let mut arguments = Arguments::new();
/// arguments.insert("id".to_string(), Argument::from(9));
///
/// let document = assemble_document(
///     OperationType::Query,
///     "Article",
///     &arguments,
///     &[Property::from("id"), Property::from("name")],
/// )
/// .unwrap();
///
/// assert_eq!(document, "query{Article(id:9){id,name}}");
/// ```
pub fn assemble_document(
    operation_type: OperationType,
    name: &str,
    arguments: &Arguments,
    properties: &[Property],
) -> Result<String, AssemblyError> {
    validate_operation_name(name)?;

    let selection = if properties.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", encode_properties(properties, false))
    };

    Ok(format!(
        "{operation_type}{{{name}{}{selection}}}",
        encode_arguments(arguments, true)
    ))
}

fn validate_operation_name(name: &str) -> Result<(), AssemblyError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(AssemblyError::EmptyOperationName);
    };
    let valid = (first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(AssemblyError::InvalidOperationName {
            name: name.to_string(),
        })
    }
}
