//! The tag suite end to end against a mock work-items service

use crate::support::{self, INITIAL_HASH};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};
use work_items_e2e::api::RequestOptions;
use work_items_e2e::assertions::{ID_REQUIRED_MESSAGE, assert_error_envelope, assert_validation_error};
use work_items_e2e::fixtures::TagOverrides;
use work_items_e2e::scenario::cases::{
    CREATE_TAG, CREATE_TAG_MISSING_ID, CREATE_TAG_MISSING_TITLE, UPDATE_TAG_EVENT,
};
use work_items_e2e::scenario::{
    CreateTag, EventTypeSelection, RunOptions, RunStage, ScenarioRunner, UpdateTagEvent, run_suite,
    setup,
};

const EVENT_TYPES: [&str; 3] = ["ColorChanged", "TitleChanged", "Moved"];

fn event_payload(request: &Request) -> (Value, Value) {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    let data: Value = serde_json::from_str(body["eventData"].as_str().unwrap()).unwrap();
    (body, data)
}

#[tokio::test]
async fn test_full_suite_passes_against_healthy_service() {
    let server = MockServer::start().await;
    support::mount_healthy_service(&server, &EVENT_TYPES).await;

    let report = run_suite(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap();

    assert!(report.is_success(), "{:?}", report);
    assert_eq!(report.passed_count(), 4);
    let names: Vec<&str> = report.cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![CREATE_TAG, UPDATE_TAG_EVENT, CREATE_TAG_MISSING_ID, CREATE_TAG_MISSING_TITLE]
    );
}

#[tokio::test]
async fn test_create_returns_matching_id_and_update_uses_it() {
    let server = MockServer::start().await;
    support::mount_healthy_service(&server, &EVENT_TYPES).await;

    let mut ctx = setup(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap();
    assert_eq!(ctx.stage(), RunStage::ReferenceDataLoaded);

    let report = ScenarioRunner::new()
        .with_scenario(CreateTag)
        .with_scenario(UpdateTagEvent)
        .run(&mut ctx)
        .await;
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(ctx.stage(), RunStage::TagUpdated);

    let creates = support::requests_to(&server, "POST", &format!("^{}$", support::tags_path())).await;
    assert_eq!(creates.len(), 1);
    let created: Value = serde_json::from_slice(&creates[0].body).unwrap();
    let created_id = created["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(created_id).is_ok());

    let updates = support::requests_to(&server, "PUT", &support::event_path_pattern()).await;
    assert_eq!(updates.len(), 1);
    assert!(updates[0].url.path().contains(created_id));

    let (body, data) = event_payload(&updates[0]);
    assert!(EVENT_TYPES.contains(&body["type"].as_str().unwrap()));
    assert_eq!(data["PreviousEventHash"], INITIAL_HASH);
    assert_eq!(data["Color"], created["color"]);
    assert!(uuid::Uuid::parse_str(data["EventId"].as_str().unwrap()).is_ok());
    assert_eq!(data["AuthorId"], "work-items-e2e");
    assert!(chrono::DateTime::parse_from_rfc3339(data["TimeOfFactOffset"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_all_event_types_chain_hashes() {
    let server = MockServer::start().await;
    support::mount_healthy_service(&server, &EVENT_TYPES).await;

    let options = RunOptions {
        seed: Some(11),
        event_type_selection: EventTypeSelection::All,
    };
    let report = run_suite(&support::run_config(&server), &options).await.unwrap();
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(report.seed, Some(11));

    let updates = support::requests_to(&server, "PUT", &support::event_path_pattern()).await;
    let sent: Vec<(String, String)> = updates
        .iter()
        .map(|request| {
            let (body, data) = event_payload(request);
            (
                body["type"].as_str().unwrap().to_string(),
                data["PreviousEventHash"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    assert_eq!(
        sent,
        vec![
            ("ColorChanged".to_string(), "hash-0".to_string()),
            ("TitleChanged".to_string(), "hash-0+ColorChanged".to_string()),
            ("Moved".to_string(), "hash-0+ColorChanged+TitleChanged".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_same_seed_picks_same_event_type() {
    let mut picked = Vec::new();

    for _ in 0..2 {
        let server = MockServer::start().await;
        support::mount_healthy_service(&server, &EVENT_TYPES).await;

        let options = RunOptions {
            seed: Some(2024),
            event_type_selection: EventTypeSelection::Random,
        };
        let report = run_suite(&support::run_config(&server), &options).await.unwrap();
        assert!(report.is_success(), "{:?}", report);

        let updates = support::requests_to(&server, "PUT", &support::event_path_pattern()).await;
        let (body, _) = event_payload(&updates[0]);
        picked.push(body["type"].as_str().unwrap().to_string());
    }

    assert_eq!(picked[0], picked[1]);
}

#[tokio::test]
async fn test_failed_create_fails_update_with_precondition() {
    let server = MockServer::start().await;
    support::mount_token(&server).await;
    support::mount_event_types(&server, &EVENT_TYPES).await;

    // Valid payloads hit a server error, invalid ones still get validated
    Mock::given(method("POST"))
        .and(path(support::tags_path()))
        .respond_with(|request: &Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            if body.get("id").is_some() && body.get("title").is_some() {
                ResponseTemplate::new(500).set_body_string("database unavailable")
            } else {
                support::create_tag_response(request)
            }
        })
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(support::event_path_pattern()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = run_suite(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap();

    let create = report.case(CREATE_TAG).unwrap().error().unwrap();
    assert_eq!(create.kind(), "AssertionFailure");
    assert!(create.to_string().contains("database unavailable"));

    let update = report.case(UPDATE_TAG_EVENT).unwrap().error().unwrap();
    assert_eq!(update.kind(), "PreconditionError");

    // Independent siblings still run
    assert!(report.case(CREATE_TAG_MISSING_ID).unwrap().passed());
    assert!(report.case(CREATE_TAG_MISSING_TITLE).unwrap().passed());
    assert_eq!(report.failed_count(), 2);
}

#[tokio::test]
async fn test_missing_id_reports_validation_message() {
    let server = MockServer::start().await;
    support::mount_healthy_service(&server, &EVENT_TYPES).await;

    let mut ctx = setup(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap();

    let payload = ctx.fixtures.tag_payload(&TagOverrides::new().omit("id"));
    assert!(payload.get("id").is_none());

    let response = ctx
        .client
        .post(&ctx.tags_url(), RequestOptions::new().json(payload))
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body = response.json().unwrap();
    assert_validation_error(&body, "Id", ID_REQUIRED_MESSAGE).unwrap();
    assert_error_envelope(&body).unwrap();
}

#[tokio::test]
async fn test_unexpected_validation_message_fails_case() {
    let server = MockServer::start().await;
    support::mount_token(&server).await;
    support::mount_event_types(&server, &EVENT_TYPES).await;

    Mock::given(method("POST"))
        .and(path(support::tags_path()))
        .respond_with(|request: &Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            if body.get("title").is_none() {
                ResponseTemplate::new(400)
                    .set_body_json(support::validation_body("Title", "'Title' must not be empty."))
            } else {
                support::create_tag_response(request)
            }
        })
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(support::event_path_pattern()))
        .respond_with(support::tag_event_response)
        .mount(&server)
        .await;

    let report = run_suite(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap();

    let failure = report.case(CREATE_TAG_MISSING_TITLE).unwrap().error().unwrap();
    assert_eq!(failure.kind(), "AssertionFailure");
    assert!(failure.to_string().contains("The Title field is required."));
    assert_eq!(report.failed_count(), 1);
}

#[tokio::test]
async fn test_invalid_credentials_abort_before_any_tag_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_client" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path_regex(format!("^{}", support::tags_path())))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = run_suite(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "AuthError");
    assert!(err.to_string().contains("invalid_client"));
}

#[tokio::test]
async fn test_event_type_fetch_failure_aborts_run() {
    let server = MockServer::start().await;
    support::mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(support::event_types_path()))
        .respond_with(ResponseTemplate::new(403).set_body_string("tenant not enabled"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(support::tags_path()))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = run_suite(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "SetupError");
    assert!(err.to_string().contains("tenant not enabled"));
}

#[tokio::test]
async fn test_empty_event_types_fail_update_only() {
    let server = MockServer::start().await;
    support::mount_healthy_service(&server, &[]).await;

    let report = run_suite(&support::run_config(&server), &RunOptions::default())
        .await
        .unwrap();

    assert!(report.case(CREATE_TAG).unwrap().passed());
    assert_eq!(
        report.case(UPDATE_TAG_EVENT).unwrap().error().unwrap().kind(),
        "PreconditionError"
    );
    assert_eq!(report.failed_count(), 1);
}
