//! GraphQL selection-set encoding.
//!
//! A [`Property`] is either a bare field, emitted as-is, or a named
//! sub-selection emitted as `name{...}`. Bare fields may themselves contain
//! pre-formatted fragments such as `"key,value"` or `"images{url}"`.
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::graphql::{encode_properties, Property};
//!
//! let properties = vec![
//!     Property::from("id"),
//!     Property::from(("metas(output:html)", "key,value")),
//!     Property::nested("images", ["url", "aspect_ratio_profile"]),
//! ];
//!
//! assert_eq!(
//!     encode_properties(&properties, true),
//!     "{id,metas(output:html){key,value},images{url,aspect_ratio_profile}}"
//! );
//! ```

use std::fmt;

/// A single entry of a selection set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Property {
    /// A field (or pre-formatted fragment) emitted verbatim.
    Field(String),
    /// A named sub-selection, emitted as `name{fields}`.
    Nested {
        /// Field name, possibly with arguments such as `metas(output:html)`.
        name: String,
        /// Selections inside the braces.
        fields: Vec<Property>,
    },
}

impl Property {
    /// Creates a named sub-selection.
    #[must_use]
    pub fn nested<I, P>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Self>,
    {
        Self::Nested {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if this is a sub-selection named `name`, either nested
    /// or pre-formatted as `name{...}`.
    #[must_use]
    pub fn is_selection_of(&self, name: &str) -> bool {
        match self {
            Self::Nested { name: own, .. } => own == name,
            Self::Field(field) => field
                .split_once('{')
                .is_some_and(|(head, _)| head.trim() == name),
        }
    }

    /// Renders this entry.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Field(field) => field.clone(),
            Self::Nested { name, fields } => format!("{name}{{{}}}", encode_properties(fields, false)),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<&str> for Property {
    fn from(field: &str) -> Self {
        Self::Field(field.to_string())
    }
}

impl From<String> for Property {
    fn from(field: String) -> Self {
        Self::Field(field)
    }
}

impl From<(&str, &str)> for Property {
    fn from((name, fields): (&str, &str)) -> Self {
        Self::nested(name, [fields])
    }
}

impl From<(&str, Vec<Self>)> for Property {
    fn from((name, fields): (&str, Vec<Self>)) -> Self {
        Self::Nested {
            name: name.to_string(),
            fields,
        }
    }
}

/// Encodes a property set, comma-joined and wrapped in `{...}` when `wrap`
/// is set. An empty set encodes to an empty string either way.
#[must_use]
pub fn encode_properties(properties: &[Property], wrap: bool) -> String {
    if properties.is_empty() {
        return String::new();
    }
    let joined = properties
        .iter()
        .map(Property::encode)
        .collect::<Vec<_>>()
        .join(",");
    if wrap {
        format!("{{{joined}}}")
    } else {
        joined
    }
}
