//! The operation builder.
//!
//! An [`Operation`] is an owned description of one GraphQL call. Combinators
//! consume and return it, and [`Operation::execute`] consumes it for good, so
//! nothing configured for one call can leak into the next.
//!
//! # Example
//!
//! ```rust
//! use audienceplayer::graphql::Operation;
//!
//! let operation = Operation::query("ArticleList")
//!     .list(true)
//!     .argument("category_id", 3)
//!     .properties(["id", "name"])
//!     .paginate(10, 20)
//!     .sort("published_at", "DESC");
//!
//! assert_eq!(
//!     operation.document().unwrap(),
//!     "query{ArticleList(category_id:3,limit:10,offset:20,\
//!      sort_by:[{field:\"published_at\",direction:desc}])\
//!      {items{pagination{limit,offset,count,total_count,page_count,page_current},id,name}}}"
//! );
//! ```

use std::fmt;

use crate::auth::{AgentKind, Scope};
use crate::client::ApiClient;
use crate::clients::Transport;
use crate::graphql::argument::{escape_string, Argument, Arguments};
use crate::graphql::document::{assemble_document, AssemblyError, OperationType};
use crate::graphql::property::Property;
use crate::graphql::response::ApiResponse;

/// Fields requested in the pagination block added by [`Operation::paginate`].
pub const PAGINATION_FIELDS: &str = "limit,offset,count,total_count,page_count,page_current";

/// Direction of a [`Operation::sort`] clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the enum literal sent to the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"asc"` in any case is ascending; everything else is descending.
impl From<&str> for SortDirection {
    fn from(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// An owned, not-yet-executed GraphQL operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    operation_type: OperationType,
    name: String,
    agent: AgentKind,
    scope: Scope,
    arguments: Arguments,
    properties: Vec<Property>,
    pagination: Option<Property>,
    is_list: bool,
}

impl Operation {
    /// Creates an operation with no arguments or properties.
    #[must_use]
    pub fn new(
        operation_type: OperationType,
        name: impl Into<String>,
        agent: AgentKind,
        scope: Scope,
    ) -> Self {
        Self {
            operation_type,
            name: name.into(),
            agent,
            scope,
            arguments: Arguments::new(),
            properties: Vec::new(),
            pagination: None,
            is_list: false,
        }
    }

    /// Creates a query authorized as the user, against the user endpoint.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(OperationType::Query, name, AgentKind::User, Scope::User)
    }

    /// Creates a mutation authorized as the user, against the user endpoint.
    #[must_use]
    pub fn mutation(name: impl Into<String>) -> Self {
        Self::new(OperationType::Mutation, name, AgentKind::User, Scope::User)
    }

    /// Sets whose bearer token authorizes the call.
    #[must_use]
    pub const fn agent(mut self, agent: AgentKind) -> Self {
        self.agent = agent;
        self
    }

    /// Sets the endpoint scope.
    #[must_use]
    pub const fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Marks the operation as returning a list, whose selection is wrapped
    /// under `items` at execution time.
    #[must_use]
    pub const fn list(mut self, is_list: bool) -> Self {
        self.is_list = is_list;
        self
    }

    /// Sets a single argument. An existing key keeps its position.
    #[must_use]
    pub fn argument(mut self, key: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Merges arguments into the current set; later keys win.
    #[must_use]
    pub fn arguments<I, K, V>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Argument>,
    {
        for (key, value) in arguments {
            self.arguments.insert(key.into(), value.into());
        }
        self
    }

    /// Replaces the requested properties.
    #[must_use]
    pub fn properties<I, P>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Property>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Sets `limit` and `offset` and requests the pagination block.
    #[must_use]
    pub fn paginate(self, limit: u32, offset: u32) -> Self {
        let mut operation = self.argument("limit", limit).argument("offset", offset);
        operation.pagination = Some(Property::nested("pagination", [PAGINATION_FIELDS]));
        operation
    }

    /// Sets the `search` argument.
    #[must_use]
    pub fn search(self, text: impl Into<String>) -> Self {
        self.argument("search", Argument::String(text.into()))
    }

    /// Sets the `locale` argument.
    #[must_use]
    pub fn locale(self, locale: impl Into<String>) -> Self {
        self.argument("locale", Argument::String(locale.into()))
    }

    /// Sets `sort_by` to a single-field sort clause.
    #[must_use]
    pub fn sort(self, field: &str, direction: impl Into<SortDirection>) -> Self {
        let clause = format!(
            "[{{field:\"{}\",direction:{}}}]",
            escape_string(field),
            direction.into()
        );
        self.argument("sort_by", Argument::Raw(clause))
    }

    /// Returns the operation type.
    #[must_use]
    pub const fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whose bearer token authorizes the call.
    #[must_use]
    pub const fn agent_kind(&self) -> AgentKind {
        self.agent
    }

    /// Returns the endpoint scope.
    #[must_use]
    pub const fn endpoint_scope(&self) -> Scope {
        self.scope
    }

    /// Returns `true` for list-returning operations.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        self.is_list
    }

    /// Returns the arguments set so far.
    #[must_use]
    pub const fn argument_values(&self) -> &Arguments {
        &self.arguments
    }

    /// Returns the properties set so far, without pagination or list wrapping.
    #[must_use]
    pub fn property_values(&self) -> &[Property] {
        &self.properties
    }

    /// Returns the selection that will be sent: the pagination block
    /// followed by the requested properties, wrapped under `items` for
    /// list operations that do not already select `items`.
    ///
    /// A `pagination` selection among the requested properties replaces the
    /// block added by [`paginate`](Self::paginate).
    #[must_use]
    pub fn selection(&self) -> Vec<Property> {
        let selects_pagination = self
            .properties
            .iter()
            .any(|p| p.is_selection_of("pagination"));
        let mut selection: Vec<Property> = self
            .pagination
            .iter()
            .filter(|_| !selects_pagination)
            .cloned()
            .collect();
        selection.extend(self.properties.iter().cloned());

        let selects_items = selection.iter().any(|p| p.is_selection_of("items"));
        if self.is_list && !selection.is_empty() && !selects_items {
            vec![Property::Nested {
                name: "items".to_string(),
                fields: selection,
            }]
        } else {
            selection
        }
    }

    /// Assembles the document this operation would send.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] if the operation name is not usable.
    pub fn document(&self) -> Result<String, AssemblyError> {
        assemble_document(
            self.operation_type,
            &self.name,
            &self.arguments,
            &self.selection(),
        )
    }

    /// Sends the operation through `client`, consuming it.
    ///
    /// Never fails: any problem is reported inside the returned response.
    pub async fn execute<T: Transport>(self, client: &ApiClient<T>) -> ApiResponse {
        client.execute(self).await
    }
}
