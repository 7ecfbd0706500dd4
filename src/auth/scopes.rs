//! OAuth scopes and access agents.
//!
//! The backend exposes two GraphQL endpoints per project, one per [`Scope`],
//! and the client keeps one bearer token per [`AgentKind`].

use std::fmt;
use std::str::FromStr;

/// OAuth scope of an operation, selecting the endpoint it is sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Administrative access, served at `/graphql/{project}/admin`.
    Admin,
    /// End-user access, served at `/graphql/{project}/user`.
    User,
}

impl Scope {
    /// Returns the scope name as it appears in token claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "api-admin-access",
            Self::User => "api-user-access",
        }
    }

    pub(crate) const fn path_segment(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown scope name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown OAuth scope '{0}'. Expected 'api-admin-access' or 'api-user-access'.")]
pub struct UnknownScopeError(pub String);

impl FromStr for Scope {
    type Err = UnknownScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "api-admin-access" => Ok(Self::Admin),
            "api-user-access" => Ok(Self::User),
            other => Err(UnknownScopeError(other.to_string())),
        }
    }
}

/// The party on whose behalf an operation is authorized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// The OAuth client itself.
    Client,
    /// An end user of the project.
    User,
}

impl AgentKind {
    /// Returns the agent name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::User => "user",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_round_trips_through_its_name() {
        for scope in [Scope::Admin, Scope::User] {
            assert_eq!(scope.as_str().parse::<Scope>().unwrap(), scope);
        }
    }

    #[test]
    fn test_unknown_scope_is_rejected() {
        let error = "api-root-access".parse::<Scope>().unwrap_err();
        assert!(error.to_string().contains("api-root-access"));
    }

    #[test]
    fn test_agent_kind_names() {
        assert_eq!(AgentKind::Client.to_string(), "client");
        assert_eq!(AgentKind::User.to_string(), "user");
    }
}
