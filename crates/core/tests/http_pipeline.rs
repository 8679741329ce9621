//! End-to-end tests of the reqwest-backed pipeline against a local HTTP server

use delivery_core::{AuthEncoding, Authenticator, Error, Headers, HttpAdapter};
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MERCHANTS: &str = r#"[{"id":"1","name":"Test"}]"#;

fn adapter(server: &MockServer) -> Arc<HttpAdapter> {
    Arc::new(HttpAdapter::new(server.uri(), Duration::from_secs(5)).expect("client builds"))
}

#[tokio::test]
async fn merchants_listing_returns_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/merchants"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MERCHANTS))
        .expect(1)
        .mount(&server)
        .await;

    let response = adapter(&server)
        .do_request(Method::GET, "/v1.0/merchants", None, &Headers::new())
        .await
        .expect("request succeeds");

    assert_eq!(response.status, 200);
    assert_eq!(&response.body[..], MERCHANTS.as_bytes());
}

#[tokio::test]
async fn error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1.0/orders/abc/statuses/confirmation"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already confirmed"))
        .mount(&server)
        .await;

    let response = adapter(&server)
        .do_request(
            Method::POST,
            "/v1.0/orders/abc/statuses/confirmation",
            None,
            &Headers::new().with_bearer("tok"),
        )
        .await
        .expect("request succeeds");

    assert_eq!(response.status, 409);
    assert_eq!(response.text(), "already confirmed");
}

#[tokio::test]
async fn per_call_timeout_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = adapter(&server)
        .do_request_with_timeout(
            Method::GET,
            "/slow",
            None,
            &Headers::new(),
            Some(Duration::from_millis(100)),
        )
        .await
        .expect_err("deadline expires first");

    assert!(err.is_network());
    assert!(err.is_timeout());
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Port 9 (discard) on localhost is not listening in test environments
    let adapter = HttpAdapter::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

    let err = adapter
        .do_request(Method::GET, "/v1.0/merchants", None, &Headers::new())
        .await
        .expect_err("nothing listens there");

    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn authenticator_posts_multipart_related_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("accept", "*/*"))
        .and(header_regex("content-type", "^multipart/related; boundary=[0-9a-f]{32}$"))
        .and(body_string_contains("Content-ID: metadata"))
        .and(body_string_contains(r#""grant_type":"password""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"access_token":"abc","token_type":"bearer","scope":"*","expires_in":3600}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Authenticator::new(adapter(&server), "id", "secret");
    auth.authenticate("user", "pass").await.expect("token issued");
    auth.validate().await.expect("fresh token");

    assert_eq!(auth.token(), "abc");
}

#[tokio::test]
async fn authenticator_form_data_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"client_id\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"access_token":"form","token_type":"bearer","expires_in":3600}"#,
        ))
        .mount(&server)
        .await;

    let auth = Authenticator::new(adapter(&server), "id", "secret")
        .with_encoding(AuthEncoding::FormData);
    auth.authenticate("user", "pass").await.expect("token issued");

    assert_eq!(auth.token(), "form");
}

#[tokio::test]
async fn rejected_login_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let auth = Authenticator::new(adapter(&server), "id", "secret");
    let err = auth.authenticate("user", "nope").await.unwrap_err();

    assert!(err.is_auth());
    assert!(auth.token().is_empty());
}
