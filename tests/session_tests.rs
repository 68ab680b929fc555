//! Integration tests for the session credential lifecycle.

use jira_api::{AuthError, BaseUrl, Credentials, RestClient, RestError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_client(server: &MockServer, credentials: Credentials) -> RestClient {
    RestClient::with_credentials(BaseUrl::new(server.uri()).unwrap(), credentials)
}

async fn mount_login(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/rest/auth/1/session"))
        .and(body_json(json!({ "username": "bob", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session": { "name": "JSESSIONID", "value": token },
            "loginInfo": { "loginCount": 1 }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_happens_once_across_requests() {
    let server = MockServer::start().await;
    mount_login(&server, "abc123", 1).await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/myself"))
        .and(header("cookie", "JSESSIONID=abc123;"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "bob" })))
        .expect(2)
        .mount(&server)
        .await;

    let client = session_client(&server, Credentials::session("bob", "secret"));
    client.get_object("rest/api/2/myself").await.unwrap();
    client.get_object("rest/api/2/myself").await.unwrap();
}

#[tokio::test]
async fn test_supplied_token_skips_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth/1/session"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/myself"))
        .and(header("cookie", "JSESSIONID=presupplied;"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = session_client(&server, Credentials::from_token("presupplied"));
    client.get_object("rest/api/2/myself").await.unwrap();
}

#[tokio::test]
async fn test_basic_credentials_send_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/myself"))
        .and(header("authorization", "Basic Ym9iOnNlY3JldA=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = session_client(&server, Credentials::basic("bob", "secret"));
    client.get_object("rest/api/2/myself").await.unwrap();
}

#[tokio::test]
async fn test_rejected_login_surfaces_and_is_retried() {
    let server = MockServer::start().await;
    // First login attempt is rejected, the next one succeeds
    Mock::given(method("POST"))
        .and(path("/rest/auth/1/session"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({
                "errorMessages": ["Login denied"]
            })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = session_client(&server, Credentials::session("bob", "secret"));
    let error = client.get_object("rest/api/2/myself").await.unwrap_err();
    assert!(matches!(error, RestError::Auth(AuthError::LoginFailed(_))));

    mount_login(&server, "second-try", 1).await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/myself"))
        .and(header("cookie", "JSESSIONID=second-try;"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.get_object("rest/api/2/myself").await.unwrap();
}

#[tokio::test]
async fn test_malformed_login_payload_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth/1/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let client = session_client(&server, Credentials::session("bob", "secret"));
    let error = client.get_object("rest/api/2/myself").await.unwrap_err();
    assert!(matches!(
        error,
        RestError::Auth(AuthError::MalformedSessionPayload)
    ));
}

#[tokio::test]
async fn test_logout_deletes_session_and_is_terminal() {
    let server = MockServer::start().await;
    mount_login(&server, "abc123", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/rest/auth/1/session"))
        .and(header("cookie", "JSESSIONID=abc123;"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/myself"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let credentials = Credentials::session("bob", "secret");
    let client = session_client(&server, credentials);

    // Establish the session, then tear it down
    client.get_object("rest/api/2/myself").await.unwrap();
    client.credentials().unwrap().logout(&client).await.unwrap();

    // Logging out twice is a no-op, and the session never comes back:
    // the login mock expects exactly one call overall
    client.credentials().unwrap().logout(&client).await.unwrap();
    client.get_object("rest/api/2/myself").await.unwrap();
}

#[tokio::test]
async fn test_failed_logout_keeps_the_session() {
    let server = MockServer::start().await;
    mount_login(&server, "abc123", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/rest/auth/1/session"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/myself"))
        .and(header("cookie", "JSESSIONID=abc123;"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = session_client(&server, Credentials::session("bob", "secret"));
    client.get_object("rest/api/2/myself").await.unwrap();

    let error = client.credentials().unwrap().logout(&client).await.unwrap_err();
    assert!(matches!(error, AuthError::LogoutFailed(_)));

    // The token is left in place, so requests keep working
    client.get_object("rest/api/2/myself").await.unwrap();
}
