//! Bearer token validation and renewal.
//!
//! A stored token is kept as long as it is still valid for the scope it will
//! be used against; otherwise the client authenticates again with its OAuth
//! credentials and stores the fresh token.

use serde::Deserialize;
use serde_json::Value;

use crate::auth::token::{validate_token_expiry, DEFAULT_MINIMUM_TTL};
use crate::auth::{AgentKind, Scope};
use crate::client::ApiClient;
use crate::clients::Transport;
use crate::graphql::{ApiResponse, Argument};
use crate::operations::mutations;

/// Backend code for "user not found", the only failure after which
/// authentication by e-mail is still attempted.
const USER_NOT_FOUND: i64 = 404;

/// Input for [`ApiClient::validated_or_renewed_user_token`].
///
/// # Example
///
/// ```rust
/// use audienceplayer::auth::UserTokenRequest;
///
/// let request = UserTokenRequest::new()
///     .user_id(42)
///     .user_email("viewer@example.com")
///     .locale("nl")
///     .auto_register(false);
///
/// assert_eq!(request.minimum_ttl_seconds(), 60);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserTokenRequest {
    user_id: Option<u64>,
    user_email: Option<String>,
    bearer_token: Option<String>,
    password: Option<String>,
    locale: Option<String>,
    name: Option<String>,
    auto_register: bool,
    allow_renewal: bool,
    minimum_ttl: i64,
}

impl Default for UserTokenRequest {
    fn default() -> Self {
        Self {
            user_id: None,
            user_email: None,
            bearer_token: None,
            password: None,
            locale: None,
            name: None,
            auto_register: true,
            allow_renewal: true,
            minimum_ttl: DEFAULT_MINIMUM_TTL,
        }
    }
}

impl UserTokenRequest {
    /// Creates a request that renews and auto-registers by default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the user id to authenticate. Zero means none.
    #[must_use]
    pub const fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = if user_id > 0 { Some(user_id) } else { None };
        self
    }

    /// Sets the user e-mail, used alongside the id and as fallback.
    #[must_use]
    pub fn user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = non_blank(email.into());
        self
    }

    /// Sets the token to validate before renewing.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = non_blank(token.into());
        self
    }

    /// Sets the password sent when authenticating by e-mail.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = non_blank(password.into());
        self
    }

    /// Sets the locale of an auto-registered user.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = non_blank(locale.into());
        self
    }

    /// Sets the name of an auto-registered user.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into());
        self
    }

    /// Whether an unknown e-mail registers a new user.
    #[must_use]
    pub const fn auto_register(mut self, auto_register: bool) -> Self {
        self.auto_register = auto_register;
        self
    }

    /// Whether an invalid token may be replaced by authenticating.
    #[must_use]
    pub const fn allow_renewal(mut self, allow_renewal: bool) -> Self {
        self.allow_renewal = allow_renewal;
        self
    }

    /// Sets how many seconds a token must remain valid to be kept.
    #[must_use]
    pub const fn minimum_ttl(mut self, seconds: i64) -> Self {
        self.minimum_ttl = seconds;
        self
    }

    /// Returns the minimum remaining validity in seconds.
    #[must_use]
    pub const fn minimum_ttl_seconds(&self) -> i64 {
        self.minimum_ttl
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Outcome of [`ApiClient::validated_or_renewed_user_token`].
///
/// Every field is `None` when no token could be obtained. When an existing
/// token was kept, only `access_token` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserAuthentication {
    /// Authenticated user id.
    #[serde(default)]
    pub user_id: Option<u64>,
    /// Authenticated user e-mail.
    #[serde(default)]
    pub user_email: Option<String>,
    /// The token now stored for [`AgentKind::User`].
    #[serde(default)]
    pub access_token: Option<String>,
    /// Seconds until `access_token` expires.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl UserAuthentication {
    /// Reads the authentication payload of a successful mutation.
    ///
    /// Only a non-empty `access_token` is required; the other fields are
    /// read when they have the expected type and left empty otherwise.
    fn from_response(response: &ApiResponse) -> Option<Self> {
        let payload = response.data_flattened()?;
        let access_token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())?;

        Some(Self {
            user_id: payload.get("user_id").and_then(Value::as_u64),
            user_email: payload
                .get("user_email")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            access_token: Some(access_token.to_string()),
            expires_in: payload.get("expires_in").and_then(Value::as_i64),
        })
    }
}

impl<T: Transport> ApiClient<T> {
    /// Ensures a usable client token is stored and returns it.
    ///
    /// `bearer_token` is kept when it stays valid for the admin scope for at
    /// least `minimum_ttl` seconds. Otherwise, if `allow_renewal` is set, the
    /// client authenticates against the admin endpoint with its configured
    /// credentials. Returns `None` when no token could be obtained.
    pub async fn validated_or_renewed_client_token(
        &mut self,
        bearer_token: Option<&str>,
        minimum_ttl: i64,
        allow_renewal: bool,
    ) -> Option<String> {
        if let Some(token) = bearer_token.filter(|t| {
            !t.is_empty() && validate_token_expiry(t, Some(Scope::Admin.as_str()), minimum_ttl)
        }) {
            self.set_bearer_token(AgentKind::Client, token);
            return Some(token.to_string());
        }

        if !allow_renewal {
            return None;
        }

        let response = mutations::admin_client_authenticate(self.config())
            .execute(self)
            .await;

        match UserAuthentication::from_response(&response).and_then(|auth| auth.access_token) {
            Some(token) => {
                tracing::debug!("Renewed client bearer token");
                self.set_bearer_token(AgentKind::Client, token.clone());
                Some(token)
            }
            None => {
                tracing::warn!(
                    code = ?response.first_error_code(),
                    "Client bearer token could not be renewed"
                );
                None
            }
        }
    }

    /// Ensures a usable user token is stored and describes it.
    ///
    /// The token in `request` is kept when it stays valid for the user scope.
    /// Otherwise, if renewal is allowed, the user is authenticated by id
    /// (never auto-registering). When that fails with anything other than
    /// "user not found" the flow stops. When no token was obtained and an
    /// e-mail is known, the user is authenticated by e-mail, optionally
    /// registering them with the given password, locale and name.
    pub async fn validated_or_renewed_user_token(
        &mut self,
        request: UserTokenRequest,
    ) -> UserAuthentication {
        let mut outcome = UserAuthentication::default();

        if let Some(token) = request.bearer_token.as_deref().filter(|t| {
            validate_token_expiry(t, Some(Scope::User.as_str()), request.minimum_ttl)
        }) {
            self.set_bearer_token(AgentKind::User, token);
            outcome.access_token = Some(token.to_string());
            return outcome;
        }

        if !request.allow_renewal {
            return outcome;
        }

        if let Some(user_id) = request.user_id {
            let mut operation =
                mutations::client_user_authenticate_by_id(self.config(), user_id, false);
            if let Some(email) = &request.user_email {
                operation = operation.argument("user_email", email);
            }

            let response = operation.execute(self).await;
            match UserAuthentication::from_response(&response) {
                Some(authentication) => {
                    outcome = self.store_user_authentication(outcome, authentication);
                }
                None if response.first_error_code() != Some(USER_NOT_FOUND) => {
                    tracing::warn!(
                        user_id,
                        code = ?response.first_error_code(),
                        "User authentication by id failed"
                    );
                    return outcome;
                }
                None => {
                    tracing::debug!(user_id, "User not found by id, trying e-mail");
                }
            }
        }

        if outcome.access_token.is_none() {
            if let Some(email) = &request.user_email {
                let optional = [
                    ("user_password", &request.password),
                    ("user_locale", &request.locale),
                    ("user_name", &request.name),
                ];
                let extra = optional
                    .into_iter()
                    .filter_map(|(key, value)| value.as_ref().map(|v| (key, Argument::from(v))));

                let response = mutations::client_user_authenticate_by_email(
                    self.config(),
                    email,
                    request.auto_register,
                )
                .arguments(extra)
                .execute(self)
                .await;

                match UserAuthentication::from_response(&response) {
                    Some(authentication) => {
                        outcome = self.store_user_authentication(outcome, authentication);
                    }
                    None => tracing::warn!(
                        code = ?response.first_error_code(),
                        "User authentication by e-mail failed"
                    ),
                }
            }
        }

        outcome
    }

    fn store_user_authentication(
        &mut self,
        current: UserAuthentication,
        renewed: UserAuthentication,
    ) -> UserAuthentication {
        if let Some(token) = &renewed.access_token {
            self.set_bearer_token(AgentKind::User, token.clone());
        }
        UserAuthentication {
            user_id: renewed.user_id.or(current.user_id),
            user_email: renewed.user_email.or(current.user_email),
            access_token: renewed.access_token,
            expires_in: renewed.expires_in.or(current.expires_in),
        }
    }
}
