//! GraphQL document building and response normalization.
//!
//! The backend is driven with inline documents rather than variables, so
//! this module carries the whole encoding pipeline:
//!
//! - [`Argument`] and [`encode_arguments`]: argument values and lists
//! - [`Property`] and [`encode_properties`]: selection sets
//! - [`assemble_document`]: the full `type{Name(args){props}}` document
//! - [`Operation`]: the builder tying the above together
//! - [`ApiResponse`]: the uniform result of every call
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::graphql::{Argument, Operation, Property};
//!
//! let operation = Operation::query("Article")
//!     .argument("id", 12)
//!     .properties([
//!         Property::from("id"),
//!         Property::from(("metas(output:html)", "key,value")),
//!     ]);
//!
//! assert_eq!(
//!     operation.document().unwrap(),
//!     "query{Article(id:12){id,metas(output:html){key,value}}}"
//! );
//! ```

mod argument;
mod document;
mod operation;
mod property;
mod response;

pub use argument::{coerce_bool, encode_argument, encode_arguments, escape_string, Argument, Arguments};
pub use document::{assemble_document, AssemblyError, OperationType};
pub use operation::{Operation, SortDirection, PAGINATION_FIELDS};
pub use property::{encode_properties, Property};
pub use response::{ApiResponse, ErrorRecord, RawResponse};
