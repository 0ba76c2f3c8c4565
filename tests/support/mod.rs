//! Mock work-items service shared by the integration tests

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};
use work_items_e2e::api::Credentials;
use work_items_e2e::assertions::{
    ID_REQUIRED_MESSAGE, TITLE_REQUIRED_MESSAGE, VALIDATION_DETAIL, VALIDATION_TITLE,
};
use work_items_e2e::config::{RunConfig, Settings};

pub const TENANT: &str = "tenant-1";
pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const ACCESS_TOKEN: &str = "acquired-token";
pub const INITIAL_HASH: &str = "hash-0";

pub const API_ROOT: &str = "/work-items/v1";

pub fn tags_path() -> String {
    format!("{}/tenants/{}/tags", API_ROOT, TENANT)
}

pub fn event_types_path() -> String {
    format!("{}/examples/event-types", tags_path())
}

pub fn event_path_pattern() -> String {
    format!("^{}/[^/]+/event$", tags_path())
}

pub fn credentials() -> Credentials {
    Credentials {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        tenant_id: TENANT.to_string(),
    }
}

pub fn quiet_settings() -> Settings {
    Settings {
        request_timeout_secs: 5,
        connect_timeout_secs: 2,
        request_logging: false,
        ..Settings::default()
    }
}

pub fn run_config(server: &MockServer) -> RunConfig {
    RunConfig {
        base_url: format!("{}{}", server.uri(), API_ROOT),
        identity_url: server.uri(),
        credentials: credentials(),
        scope: None,
        settings: quiet_settings(),
    }
}

pub fn validation_body(field: &str, message: &str) -> Value {
    json!({
        "type": "https://tools.ietf.org/html/rfc7231#section-6.5.1",
        "title": VALIDATION_TITLE,
        "status": 400,
        "detail": VALIDATION_DETAIL,
        "errors": { field: [message] }
    })
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_event_types(server: &MockServer, event_types: &[&str]) {
    Mock::given(method("GET"))
        .and(path(event_types_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(event_types)))
        .mount(server)
        .await;
}

/// Validation the real service performs on create
pub fn create_tag_response(request: &Request) -> ResponseTemplate {
    let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
        return ResponseTemplate::new(415);
    };

    if body.get("id").is_none() {
        return ResponseTemplate::new(400).set_body_json(validation_body("Id", ID_REQUIRED_MESSAGE));
    }
    if body.get("title").is_none() {
        return ResponseTemplate::new(400).set_body_json(validation_body("Title", TITLE_REQUIRED_MESSAGE));
    }

    let mut created = body.clone();
    created["latestEventHash"] = json!(INITIAL_HASH);
    ResponseTemplate::new(201).set_body_json(created)
}

/// Echo the tag with a hash derived from the previous one
pub fn tag_event_response(request: &Request) -> ResponseTemplate {
    let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
        return ResponseTemplate::new(415);
    };
    let Some(event_data) = body["eventData"]
        .as_str()
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
    else {
        return ResponseTemplate::new(400);
    };

    let previous = event_data["PreviousEventHash"].as_str().unwrap_or("none");
    ResponseTemplate::new(200).set_body_json(json!({
        "id": request.url.path().split('/').rev().nth(1).unwrap_or_default(),
        "latestEventHash": format!("{}+{}", previous, body["type"].as_str().unwrap_or_default())
    }))
}

/// Token, event types, create and update endpoints all behaving
pub async fn mount_healthy_service(server: &MockServer, event_types: &[&str]) {
    mount_token(server).await;
    mount_event_types(server, event_types).await;

    Mock::given(method("POST"))
        .and(path(tags_path()))
        .respond_with(create_tag_response)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(event_path_pattern()))
        .respond_with(tag_event_response)
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, http_method: &str, url_path_pattern: &str) -> Vec<Request> {
    let pattern = regex::Regex::new(url_path_pattern).unwrap();
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == http_method && pattern.is_match(r.url.path()))
        .collect()
}
