//! Integration tests for bearer token validation and renewal.
//!
//! Tokens are signed with `jsonwebtoken`; the client never verifies the
//! signature, it only inspects the payload for `exp` and `scopes`.

use audienceplayer::auth::{validate_token_expiry, TokenClaims, UserAuthentication, UserTokenRequest};
use audienceplayer::{AgentKind, ApiBaseUrl, ApiClient, ApiConfig, ClientId, ClientSecret, ProjectId};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a signed token expiring `ttl` seconds from now with the given scopes.
fn create_token(ttl: i64, scopes: &[&str]) -> String {
    let claims = json!({
        "sub": "42",
        "exp": Utc::now().timestamp() + ttl,
        "scopes": scopes,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-key"))
        .expect("Failed to encode JWT")
}

fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::builder()
        .client_id(ClientId::new("test-client").unwrap())
        .client_secret(ClientSecret::new("test-secret").unwrap())
        .project_id(ProjectId::new(1).unwrap())
        .api_base_url(ApiBaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    ApiClient::new(config).unwrap()
}

fn authenticated(operation: &str, token: &str) -> ResponseTemplate {
    let mut data = Map::new();
    data.insert(
        operation.to_string(),
        json!({
            "access_token": token,
            "user_id": 42,
            "user_email": "viewer@example.com",
            "expires_in": 3600
        }),
    );
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

fn failed(operation: &str, code: i64) -> ResponseTemplate {
    let mut data = Map::new();
    data.insert(operation.to_string(), Value::Null);
    ResponseTemplate::new(200).set_body_json(json!({
        "data": data,
        "errors": [{"message": "failed", "code": code}]
    }))
}

// === Token inspection ===

#[test]
fn test_jsonwebtoken_tokens_are_inspected() {
    let token = create_token(3600, &["api-user-access"]);

    let claims = TokenClaims::from_token(&token).unwrap();
    assert_eq!(claims.scopes, vec!["api-user-access".to_string()]);
    assert!(claims.exp > Utc::now().timestamp());

    assert!(validate_token_expiry(&token, Some("api-user-access"), 60));
    assert!(!validate_token_expiry(&token, Some("api-admin-access"), 60));
    assert!(!validate_token_expiry(&token, Some("api-user-access"), 7200));
}

#[test]
fn test_token_without_scopes_is_valid_for_any_scope() {
    let token = create_token(3600, &[]);
    assert!(validate_token_expiry(&token, Some("api-admin-access"), 60));
}

#[test]
fn test_expired_token_is_invalid() {
    let token = create_token(-10, &["api-user-access"]);
    assert!(!validate_token_expiry(&token, None, 0));
}

// === Client token ===

#[tokio::test]
async fn test_valid_client_token_is_kept_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let token = create_token(3600, &["api-admin-access"]);

    let result = client
        .validated_or_renewed_client_token(Some(&token), 60, true)
        .await;

    assert_eq!(result.as_deref(), Some(token.as_str()));
    assert_eq!(client.bearer_token(AgentKind::Client), Some(token.as_str()));
}

#[tokio::test]
async fn test_expiring_client_token_is_renewed_against_admin_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/admin"))
        .and(body_string_contains("mutation{ClientAuthenticate(project_id:1,"))
        .respond_with(authenticated("ClientAuthenticate", "renewed-client-token"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let stale = create_token(30, &["api-admin-access"]);

    let result = client
        .validated_or_renewed_client_token(Some(&stale), 60, true)
        .await;

    assert_eq!(result.as_deref(), Some("renewed-client-token"));
    assert_eq!(client.bearer_token(AgentKind::Client), Some("renewed-client-token"));
}

#[tokio::test]
async fn test_user_scoped_token_is_not_accepted_as_client_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/admin"))
        .respond_with(authenticated("ClientAuthenticate", "admin-token"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let user_token = create_token(3600, &["api-user-access"]);

    let result = client
        .validated_or_renewed_client_token(Some(&user_token), 60, true)
        .await;

    assert_eq!(result.as_deref(), Some("admin-token"));
}

#[tokio::test]
async fn test_client_token_without_renewal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let result = client.validated_or_renewed_client_token(None, 60, false).await;

    assert_eq!(result, None);
    assert_eq!(client.bearer_token(AgentKind::Client), None);
}

#[tokio::test]
async fn test_failed_client_renewal_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(failed("ClientAuthenticate", 401))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let result = client.validated_or_renewed_client_token(None, 60, true).await;

    assert_eq!(result, None);
    assert_eq!(client.bearer_token(AgentKind::Client), None);
}

// === User token ===

#[tokio::test]
async fn test_valid_user_token_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let token = create_token(3600, &["api-user-access"]);

    let outcome = client
        .validated_or_renewed_user_token(UserTokenRequest::new().user_id(42).bearer_token(token.clone()))
        .await;

    assert_eq!(
        outcome,
        UserAuthentication {
            access_token: Some(token.clone()),
            ..UserAuthentication::default()
        }
    );
    assert_eq!(client.bearer_token(AgentKind::User), Some(token.as_str()));
}

#[tokio::test]
async fn test_user_authenticated_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/user"))
        .and(body_string_contains("user_id:42"))
        .and(body_string_contains(r#"user_email:\"viewer@example.com\""#))
        .respond_with(authenticated("ClientUserAuthenticate", "user-token"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let outcome = client
        .validated_or_renewed_user_token(
            UserTokenRequest::new()
                .user_id(42)
                .user_email("viewer@example.com"),
        )
        .await;

    assert_eq!(outcome.access_token.as_deref(), Some("user-token"));
    assert_eq!(outcome.user_id, Some(42));
    assert_eq!(outcome.user_email.as_deref(), Some("viewer@example.com"));
    assert_eq!(outcome.expires_in, Some(3600));
    assert_eq!(client.bearer_token(AgentKind::User), Some("user-token"));
}

#[tokio::test]
async fn test_unknown_user_id_falls_back_to_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("user_id:42"))
        .respond_with(failed("ClientUserAuthenticate", 404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("auto_register:true"))
        .respond_with(authenticated("ClientUserAuthenticate", "registered-token"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let outcome = client
        .validated_or_renewed_user_token(
            UserTokenRequest::new()
                .user_id(42)
                .user_email("viewer@example.com"),
        )
        .await;

    assert_eq!(outcome.access_token.as_deref(), Some("registered-token"));
    assert_eq!(client.bearer_token(AgentKind::User), Some("registered-token"));
}

#[tokio::test]
async fn test_other_errors_stop_the_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("user_id:42"))
        .respond_with(failed("ClientUserAuthenticate", 500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("auto_register"))
        .respond_with(authenticated("ClientUserAuthenticate", "never"))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let outcome = client
        .validated_or_renewed_user_token(
            UserTokenRequest::new()
                .user_id(42)
                .user_email("viewer@example.com"),
        )
        .await;

    assert_eq!(outcome, UserAuthentication::default());
    assert_eq!(client.bearer_token(AgentKind::User), None);
}

#[tokio::test]
async fn test_email_authentication_carries_registration_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            r#"user_email:\"new@example.com\",auto_register:false,user_password:\"pw\",user_locale:\"nl\",user_name:\"New Viewer\""#,
        ))
        .respond_with(authenticated("ClientUserAuthenticate", "email-token"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let outcome = client
        .validated_or_renewed_user_token(
            UserTokenRequest::new()
                .user_email("new@example.com")
                .password("pw")
                .locale("nl")
                .name("New Viewer")
                .auto_register(false),
        )
        .await;

    assert_eq!(outcome.access_token.as_deref(), Some("email-token"));
}

#[tokio::test]
async fn test_user_token_without_renewal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let expired = create_token(-60, &["api-user-access"]);
    let outcome = client
        .validated_or_renewed_user_token(
            UserTokenRequest::new()
                .user_id(42)
                .bearer_token(expired)
                .allow_renewal(false),
        )
        .await;

    assert_eq!(outcome, UserAuthentication::default());
}
