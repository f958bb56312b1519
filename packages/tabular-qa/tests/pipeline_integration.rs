//! End-to-end pipeline tests against a mock Airtable server.

use std::time::Duration;

use tabular_qa::testing::MockAgent;
use tabular_qa::{Credentials, Pipeline, PipelineError, PipelineState, QueryOptions, Stage};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new("sk-test", "patTEST", "https://airtable.com/appBASE/tblTABLE")
}

async fn mount_records(server: &MockServer, records: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/appBASE/tblTABLE"))
        .and(header("Authorization", "Bearer patTEST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "records": records })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn answers_count_question_over_fetched_records() {
    let server = MockServer::start().await;
    mount_records(
        &server,
        serde_json::json!([
            {"id": "rec1", "createdTime": "2024-03-01T12:00:00.000Z", "fields": {"Name": "A"}},
            {"id": "rec2", "createdTime": "2024-03-02T12:00:00.000Z", "fields": {"Name": "B", "Age": 30}},
        ]),
    )
    .await;

    let agent = MockAgent::new().with_answer("how many records are there?", "There are 2 records.");
    let mut pipeline = Pipeline::new(agent).with_airtable_base_url(server.uri());
    pipeline.configure(credentials()).unwrap();

    let answer = pipeline
        .ask("how many records are there?", &QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(answer.text, "There are 2 records.");
    assert_eq!(answer.record_count, 2);
    assert_eq!(pipeline.state(), PipelineState::Answered);
}

#[tokio::test]
async fn agent_sees_flattened_table_with_id_column() {
    let server = MockServer::start().await;
    mount_records(
        &server,
        serde_json::json!([
            {"id": "rec1", "fields": {"Name": "A"}},
            {"id": "rec2", "fields": {"Name": "B", "Age": 30}},
        ]),
    )
    .await;

    let agent = MockAgent::new();
    // Clones share the call log, so this probe sees calls made by the
    // agent after it moves into the pipeline.
    let probe = agent.clone();
    let mut pipeline = Pipeline::new(agent).with_airtable_base_url(server.uri());
    pipeline.configure(credentials()).unwrap();
    pipeline
        .ask("what is in the table?", &QueryOptions::default())
        .await
        .unwrap();

    let calls = probe.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].question, "what is in the table?");
    assert_eq!(calls[0].table_contents, "Name,Age,id\nA,,rec1\nB,30,rec2\n");
    // Exported file is cleaned up once the query completes.
    assert!(!calls[0].table_csv.exists());
}

#[tokio::test]
async fn fetch_failure_is_tagged_with_fetch_stage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appBASE/tblTABLE"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let mut pipeline = Pipeline::new(MockAgent::new()).with_airtable_base_url(server.uri());
    pipeline.configure(credentials()).unwrap();

    let err = pipeline
        .ask("anything", &QueryOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Fetch);
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

#[tokio::test]
async fn agent_failure_surfaces_its_reason() {
    let server = MockServer::start().await;
    mount_records(&server, serde_json::json!([])).await;

    let agent = MockAgent::new().failing_with("context window exceeded");
    let mut pipeline = Pipeline::new(agent).with_airtable_base_url(server.uri());
    pipeline.configure(credentials()).unwrap();

    let err = pipeline
        .ask("anything", &QueryOptions::default())
        .await
        .unwrap_err();
    match &err {
        PipelineError::Agent { reason } => assert_eq!(reason, "context window exceeded"),
        other => panic!("expected Agent error, got {other:?}"),
    }
    assert_eq!(err.stage(), Stage::Agent);
}

#[tokio::test]
async fn slow_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appBASE/tblTABLE"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"records": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut pipeline = Pipeline::new(MockAgent::new()).with_airtable_base_url(server.uri());
    pipeline.configure(credentials()).unwrap();

    let opts = QueryOptions {
        timeout: Some(Duration::from_millis(50)),
        cancel: None,
    };
    let err = pipeline.ask("anything", &opts).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Timeout { stage: Stage::Fetch }
    ));
}

#[tokio::test]
async fn requery_after_answer_is_permitted() {
    let server = MockServer::start().await;
    mount_records(&server, serde_json::json!([{"id": "rec1", "fields": {"N": 1}}])).await;

    let agent = MockAgent::new().with_default_answer("one record");
    let mut pipeline = Pipeline::new(agent).with_airtable_base_url(server.uri());
    pipeline.configure(credentials()).unwrap();

    pipeline.ask("first", &QueryOptions::default()).await.unwrap();
    assert_eq!(pipeline.state(), PipelineState::Answered);

    let second = pipeline.ask("second", &QueryOptions::default()).await.unwrap();
    assert_eq!(second.text, "one record");
    assert_eq!(pipeline.state(), PipelineState::Answered);
}
