//! Bearer token storage and inspection.
//!
//! Tokens are treated as opaque dot-delimited strings whose components are
//! base64-encoded JSON. Signatures are never verified here; the backend does
//! that. Inspection only answers "is this token worth sending", so a
//! malformed token is simply reported as invalid.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::auth::AgentKind;

/// Default minimum remaining lifetime, in seconds, for a token to count as valid.
pub const DEFAULT_MINIMUM_TTL: i64 = 60;

/// One of the three dot-delimited components of a bearer token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenComponent {
    /// The first component.
    Header,
    /// The second component, carrying the claims.
    Payload,
    /// The third component.
    Signature,
}

impl TokenComponent {
    const fn index(self) -> usize {
        match self {
            Self::Header => 0,
            Self::Payload => 1,
            Self::Signature => 2,
        }
    }
}

/// Decodes one component of a bearer token into JSON.
///
/// Both URL-safe and standard base64 alphabets are accepted, with or without
/// padding. Returns `None` when the component is missing, not base64, not
/// JSON, or JSON `null`.
///
/// # Example
///
/// ```rust
/// use audienceplayer::auth::{decode_token_component, TokenComponent};
///
/// // {"alg":"HS256"} . {"exp":1}
/// let token = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjF9.c2ln";
/// let payload = decode_token_component(token, TokenComponent::Payload).unwrap();
/// assert_eq!(payload["exp"], 1);
/// ```
#[must_use]
pub fn decode_token_component(token: &str, component: TokenComponent) -> Option<Value> {
    let encoded = token.split('.').nth(component.index())?.trim();
    let encoded = encoded.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded))
        .ok()?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Null) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

/// The claims of a bearer token relevant to expiry checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenClaims {
    /// Expiry as a Unix timestamp in seconds.
    pub exp: i64,
    /// Scopes granted to the token; empty when the claim is absent.
    pub scopes: Vec<String>,
}

impl TokenClaims {
    /// Extracts the claims from a token payload.
    ///
    /// Returns `None` when the payload has no numeric `exp` claim.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let payload = decode_token_component(token, TokenComponent::Payload)?;
        let exp = payload
            .get("exp")
            .and_then(|exp| exp.as_i64().or_else(|| exp.as_f64().map(whole_seconds)))?;
        let scopes = payload
            .get("scopes")
            .and_then(Value::as_array)
            .map(|scopes| {
                scopes
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Some(Self { exp, scopes })
    }
}

/// Rounds a fractional timestamp down to whole seconds, saturating at the
/// bounds of `i64` (`NaN` becomes 0).
#[allow(clippy::cast_possible_truncation)]
fn whole_seconds(timestamp: f64) -> i64 {
    timestamp.floor() as i64
}

/// Checks that a token outlives `minimum_ttl` seconds from now.
///
/// When `scope` is given and the token carries a non-empty `scopes` claim,
/// the scope must also be listed there. Tokens without a `scopes` claim are
/// judged on expiry alone.
#[must_use]
pub fn validate_token_expiry(token: &str, scope: Option<&str>, minimum_ttl: i64) -> bool {
    validate_token_expiry_at(token, scope, minimum_ttl, Utc::now())
}

/// Same as [`validate_token_expiry`], against an explicit clock.
#[must_use]
pub fn validate_token_expiry_at(
    token: &str,
    scope: Option<&str>,
    minimum_ttl: i64,
    now: DateTime<Utc>,
) -> bool {
    let Some(claims) = TokenClaims::from_token(token) else {
        return false;
    };

    let alive = claims.exp > now.timestamp().saturating_add(minimum_ttl);
    match scope {
        Some(scope) if !claims.scopes.is_empty() => {
            alive && claims.scopes.iter().any(|granted| granted == scope)
        }
        _ => alive,
    }
}

/// Bearer tokens held by a client, one per [`AgentKind`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BearerTokens {
    client: Option<String>,
    user: Option<String>,
}

impl BearerTokens {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token for `agent`, if one is set.
    #[must_use]
    pub fn get(&self, agent: AgentKind) -> Option<&str> {
        match agent {
            AgentKind::Client => self.client.as_deref(),
            AgentKind::User => self.user.as_deref(),
        }
    }

    /// Stores the token for `agent`. An empty token clears the slot.
    pub fn set(&mut self, agent: AgentKind, token: impl Into<String>) {
        let token = token.into();
        let token = if token.is_empty() { None } else { Some(token) };
        match agent {
            AgentKind::Client => self.client = token,
            AgentKind::User => self.user = token,
        }
    }
}

impl std::fmt::Debug for BearerTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |token: &Option<String>| token.as_ref().map(|_| "*****");
        f.debug_struct("BearerTokens")
            .field("client", &mask(&self.client))
            .field("user", &mask(&self.user))
            .finish()
    }
}
