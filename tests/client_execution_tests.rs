//! Integration tests for operation execution over HTTP.
//!
//! These tests drive [`ApiClient`] with the real reqwest transport against a
//! mock server and verify request shape, endpoint routing and response
//! normalization.

use audienceplayer::operations::{mutations, queries};
use audienceplayer::{
    AgentKind, ApiBaseUrl, ApiClient, ApiConfig, ApiConfigBuilder, ClientId, ClientSecret,
    Operation, ProjectId, RawCall, Scope,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration builder pointing at the given base URL.
fn config_for(base_url: &str) -> ApiConfigBuilder {
    ApiConfig::builder()
        .client_id(ClientId::new("test-client").unwrap())
        .client_secret(ClientSecret::new("test-secret").unwrap())
        .project_id(ProjectId::new(1).unwrap())
        .api_base_url(ApiBaseUrl::new(base_url).unwrap())
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(config_for(&server.uri()).build().unwrap()).unwrap()
}

// ============================================================================
// Request Shape
// ============================================================================

#[tokio::test]
async fn test_post_request_carries_document_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/user"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept-Language", "nl"))
        .and(header("X-Forwarded-For", "203.0.113.7"))
        .and(header("Authorization", "Bearer user-token"))
        .and(body_json(json!({"query": "query{UserDetails{id,email,name}}"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"UserDetails": {"id": 42, "email": "viewer@example.com", "name": "Viewer"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri())
        .locale(" nl ")
        .forwarded_for("203.0.113.7")
        .build()
        .unwrap();
    let mut client = ApiClient::new(config).unwrap();
    client.set_bearer_token(AgentKind::User, "user-token");

    let response = queries::user_details().execute(&client).await;

    assert!(response.is_successful());
    assert_eq!(
        response.data_flattened(),
        Some(&json!({"id": 42, "email": "viewer@example.com", "name": "Viewer"}))
    );
}

#[tokio::test]
async fn test_user_agent_includes_prefix_and_version() {
    let expected = format!(
        "MyPortal/2.1 | AudiencePlayer API Client v{} | Rust {}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_RUST_VERSION")
    );

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("User-Agent", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri())
        .user_agent_prefix("MyPortal/2.1")
        .build()
        .unwrap();
    let client = ApiClient::new(config).unwrap();

    let response = queries::device_list().execute(&client).await;
    assert!(response.is_successful());
}

#[tokio::test]
async fn test_query_as_get_sends_url_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graphql/1/user"))
        .and(query_param("query", "\"query{Product(id:3){id}}\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"Product": {"id": 3}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri()).query_as_post(false).build().unwrap();
    let client = ApiClient::new(config).unwrap();

    let response = queries::product(3).properties(["id"]).execute(&client).await;

    assert!(response.is_successful());
    assert_eq!(response.data_flattened(), Some(&json!({"id": 3})));
}

#[tokio::test]
async fn test_mutation_mode_is_independent_of_query_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/user"))
        .and(body_string_contains("UserDevicePairingDelete(device_id:5)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"UserDevicePairingDelete": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server.uri()).query_as_post(false).build().unwrap();
    let client = ApiClient::new(config).unwrap();

    let response = mutations::user_device_pairing_delete(5).execute(&client).await;
    assert!(response.is_successful());
}

// ============================================================================
// Endpoint Routing
// ============================================================================

#[tokio::test]
async fn test_admin_operations_use_admin_endpoint_and_client_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/admin"))
        .and(header("Authorization", "Bearer client-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"ClientAuthenticate": {"access_token": "fresh"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_bearer_token(AgentKind::Client, "client-token");
    client.set_bearer_token(AgentKind::User, "user-token");

    let response = mutations::admin_client_authenticate(client.config())
        .execute(&client)
        .await;

    assert!(response.is_successful());
    assert_eq!(response.data_flattened().unwrap()["access_token"], "fresh");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&format!("{}/", server.uri())).build().unwrap();
    let client = ApiClient::new(config).unwrap();

    let response = queries::user_details().execute(&client).await;
    assert!(response.is_successful());
}

// ============================================================================
// Response Normalization
// ============================================================================

#[tokio::test]
async fn test_graphql_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"Article": null},
            "errors": [{"message": "Article not found", "code": 404}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = queries::article(99, None).execute(&client).await;

    assert!(response.is_data_parsed());
    assert!(response.has_errors());
    assert!(!response.is_successful());
    assert_eq!(response.first_error_code(), Some(404));
    assert_eq!(response.errors()[0].message, "Article not found");
}

#[tokio::test]
async fn test_non_success_status_body_is_still_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"message": "Unauthenticated", "code": 401}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = queries::user_details().execute(&client).await;

    assert!(response.is_data_parsed());
    assert_eq!(response.first_error_code(), Some(401));
}

#[tokio::test]
async fn test_unparseable_body_yields_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = queries::user_details().execute(&client).await;

    assert!(!response.is_data_parsed());
    assert_eq!(response.first_error_code(), Some(5002));
    assert_eq!(response.errors()[0].operation.as_deref(), Some("UserDetails"));
}

#[tokio::test]
async fn test_empty_body_yields_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = queries::user_details().execute(&client).await;

    assert_eq!(response.first_error_code(), Some(5002));
}

#[tokio::test]
async fn test_body_without_data_or_errors_yields_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = queries::user_details().execute(&client).await;

    assert!(!response.is_data_parsed());
    assert_eq!(response.first_error_code(), Some(5003));
}

#[tokio::test]
async fn test_unreachable_endpoint_yields_dispatch_error() {
    let config = config_for("http://127.0.0.1:1").build().unwrap();
    let client = ApiClient::new(config).unwrap();

    let response = queries::user_details().execute(&client).await;

    assert!(!response.is_successful());
    assert_eq!(response.first_error_code(), Some(5001));
    assert_eq!(response.operation_query(), "query{UserDetails{id,email,name}}");
}

// ============================================================================
// Raw Calls and User Helpers
// ============================================================================

#[tokio::test]
async fn test_raw_call_with_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql/1/admin"))
        .and(header("Authorization", "Bearer explicit-token"))
        .and(body_json(json!({
            "query": "query($id:Int){Article(id:$id){id}}",
            "variables": {"id": 12}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"Article": {"id": 12}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let call = RawCall::new(Scope::Admin, "query($id:Int){Article(id:$id){id}}")
        .variables(json!({"id": 12}))
        .operation_name("Article")
        .bearer_token("explicit-token");

    let response = client.execute_raw(call).await;
    assert_eq!(response.data_flattened(), Some(&json!({"id": 12})));
}

#[tokio::test]
async fn test_fetch_user_defaults_to_id_and_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            r#"ClientUser(project_id:1,client_id:\"test-client\",client_secret:\"test-secret\",id:42){id,email}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"ClientUser": {"id": 42, "email": "viewer@example.com"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.fetch_user(42, None, Vec::new()).await;

    assert!(response.is_successful());
    assert_eq!(response.data_flattened().unwrap()["email"], "viewer@example.com");
}

#[tokio::test]
async fn test_invalid_operation_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = Operation::query("1Invalid").execute(&client).await;

    assert_eq!(response.first_error_code(), Some(4000));
}
