//! Crew reconciliation over HTTP: fetch job and roster, then apply the diff.

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workiz::{ErrorKind, Job, Lead, WorkizClient};

const TOKEN: &str = "api_test_token";

fn client_for(server: &MockServer) -> WorkizClient {
    WorkizClient::new(TOKEN, "sec_test_secret", &server.uri()).unwrap()
}

async fn mount_team(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/{TOKEN}/team/all/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flag": true,
            "data": [
                {"id": "228777", "name": "Nathan Thomas", "active": true},
                // Renamed since being put on the job below.
                {"id": "246389", "name": "Brooklyn Smith", "active": true},
                {"id": "251010", "name": "Alissa Thomas", "active": true}
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_crew_call(server: &MockServer, resource: &str, user: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/{TOKEN}/{resource}")))
        .and(body_partial_json(json!({"User": user})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"flag": true, "data": []})))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_set_crew_applies_minimal_diff() {
    let mock_server = MockServer::start().await;
    mount_team(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(format!("/{TOKEN}/jobs/get/XZDO9T/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flag": true,
            "data": [{
                "UUID": "XZDO9T",
                "Team": [
                    {"id": "228777", "name": "Nathan Thomas"},
                    {"id": "246389", "name": "Brooklyn Thomas"}
                ]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_crew_call(&mock_server, "jobs/assign/", "Alissa Thomas", 1).await;
    // Removed under the current roster name, not the stale one.
    mount_crew_call(&mock_server, "jobs/unassign/", "Brooklyn Smith", 1).await;
    mount_crew_call(&mock_server, "jobs/assign/", "Nathan Thomas", 0).await;
    mount_crew_call(&mock_server, "jobs/unassign/", "Nathan Thomas", 0).await;

    let client = client_for(&mock_server);
    let desired = vec!["Nathan Thomas".to_string(), "Alissa Thomas".to_string()];
    let changes = Job::set_crew(&client, &CancellationToken::new(), "XZDO9T", &desired)
        .await
        .unwrap();

    assert_eq!(changes.added, vec!["Alissa Thomas".to_string()]);
    assert_eq!(changes.removed, vec!["Brooklyn Smith".to_string()]);
}

#[tokio::test]
async fn test_set_crew_on_lead_with_renamed_member_is_noop() {
    let mock_server = MockServer::start().await;
    mount_team(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(format!("/{TOKEN}/lead/get/SRUYUI/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flag": true,
            "data": [{
                "UUID": "SRUYUI",
                "Team": [{"id": "246389", "name": "Brooklyn Thomas"}]
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let changes = Lead::set_crew(
        &client,
        &CancellationToken::new(),
        "SRUYUI",
        &["Brooklyn Smith".to_string()],
    )
    .await
    .unwrap();

    assert!(changes.is_noop());
}

#[tokio::test]
async fn test_set_crew_on_missing_job_fails_before_any_change() {
    let mock_server = MockServer::start().await;
    mount_team(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(format!("/{TOKEN}/jobs/get/GONE00/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"flag": false, "data": []})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = Job::set_crew(
        &client,
        &CancellationToken::new(),
        "GONE00",
        &["Nathan Thomas".to_string()],
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}
