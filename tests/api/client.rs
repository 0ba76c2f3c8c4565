use crate::support::{self, ACCESS_TOKEN};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use work_items_e2e::api::{HttpTestClient, RequestOptions, Token};
use work_items_e2e::config::Settings;

fn client() -> HttpTestClient {
    HttpTestClient::new(&support::quiet_settings()).unwrap()
}

fn token() -> Arc<Token> {
    Arc::new(Token {
        access_token: ACCESS_TOKEN.to_string(),
        expires_at: None,
    })
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .and(header("Authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["a", "b"])))
        .expect(1)
        .mount(&server)
        .await;

    let response = client()
        .with_token(token())
        .get(
            &format!("{}/things", server.uri()),
            RequestOptions::new().accept("application/json"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.json().unwrap(), json!(["a", "b"]));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client()
        .get(&format!("{}/open", server.uri()), RequestOptions::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/things"))
        .and(body_json(json!({ "title": "x" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "title": "bad" })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client().with_token(token());

    let created = client
        .post(
            &format!("{}/things", server.uri()),
            RequestOptions::new().json(json!({ "title": "x" })),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), 400);
    assert!(!created.is_success());
    assert_eq!(created.json().unwrap()["title"], "bad");

    let updated = client
        .put(&format!("{}/things/1", server.uri()), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(updated.status(), 500);
    assert_eq!(updated.text(), "boom");
}

#[tokio::test]
async fn test_json_body_sets_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let response = client()
        .post(&server.uri(), RequestOptions::new().json(json!({ "id": "1" })))
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind then drop to get a port with nothing listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = client()
        .get(&format!("http://127.0.0.1:{}/things", port), RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "NetworkError");
    assert!(err.to_string().contains(&port.to_string()));
}

#[tokio::test]
async fn test_request_timeout_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let settings = Settings {
        request_timeout_secs: 1,
        ..support::quiet_settings()
    };
    let err = HttpTestClient::new(&settings)
        .unwrap()
        .get(&format!("{}/slow", server.uri()), RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "NetworkError");
    assert!(err.to_string().contains("/slow"));
}
