//! E2E tests using the mock Workiz server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use tokio_util::sync::CancellationToken;
use workiz::mock_server::{CrewKind, Fixtures, MockServer, MockState};
use workiz::{
    list_team, Create, Customer, DateRange, ErrorKind, Get, Job, Lead, List, ListQuery,
    WorkizClient,
};

fn client_for(server: &MockServer) -> WorkizClient {
    server.client().unwrap()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Crew Workflows
// =============================================================================

#[tokio::test]
async fn test_set_crew_reaches_desired_state() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let cancel = CancellationToken::new();

    let changes = Job::set_crew(
        &client,
        &cancel,
        "XZDO9T",
        &names(&["Nathan Thomas", "Alissa Thomas"]),
    )
    .await
    .unwrap();

    assert_eq!(changes.added, names(&["Alissa Thomas"]));
    assert_eq!(changes.removed, names(&["Brooklyn Thomas"]));

    let job = Job::get(&client, &cancel, "XZDO9T".to_string()).await.unwrap();
    let mut crew: Vec<&str> = job.team.iter().map(|r| r.name.as_str()).collect();
    crew.sort_unstable();
    assert_eq!(crew, vec!["Alissa Thomas", "Nathan Thomas"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_set_crew_twice_is_idempotent() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let cancel = CancellationToken::new();
    let desired = names(&["Alissa Thomas"]);

    Lead::set_crew(&client, &cancel, "SRUYUI", &desired)
        .await
        .unwrap();
    let calls_after_first = server.state().read().await.crew_calls.len();

    let second = Lead::set_crew(&client, &cancel, "SRUYUI", &desired)
        .await
        .unwrap();

    assert!(second.is_noop());
    assert_eq!(server.state().read().await.crew_calls.len(), calls_after_first);

    server.shutdown().await;
}

#[tokio::test]
async fn test_renamed_member_is_reconciled_by_id() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let cancel = CancellationToken::new();

    server
        .state()
        .write()
        .await
        .rename_member("246389", "Brooklyn Smith");

    // The job still records "Brooklyn Thomas"; the desired name is the new one.
    let changes = Job::set_crew(
        &client,
        &cancel,
        "XZDO9T",
        &names(&["Nathan Thomas", "Brooklyn Smith"]),
    )
    .await
    .unwrap();

    assert!(changes.is_noop());
    assert!(server.state().read().await.crew_calls.is_empty());

    // Dropping the renamed member unassigns them by their current name.
    let changes = Job::set_crew(&client, &cancel, "XZDO9T", &names(&["Nathan Thomas"]))
        .await
        .unwrap();

    assert_eq!(changes.removed, names(&["Brooklyn Smith"]));
    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.crew_calls.len(), 1);
    assert_eq!(state.crew_calls[0].kind, CrewKind::Job);
    assert_eq!(state.crew_calls[0].action, "unassign");
    assert_eq!(state.jobs["XZDO9T"].team.len(), 1);
    drop(state);

    server.shutdown().await;
}

#[tokio::test]
async fn test_reassigning_existing_member_is_absorbed() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let cancel = CancellationToken::new();

    // Assign behind the reconciler's back, as a concurrent editor would.
    server
        .state()
        .write()
        .await
        .change_crew(CrewKind::Lead, "assign", "SRUYUI", "Alissa Thomas")
        .unwrap();

    let target = workiz::CrewTarget::new(&client, workiz::CrewEntity::Lead, "SRUYUI");
    workiz::Assigner::assign(&target, &cancel, "Alissa Thomas")
        .await
        .expect("server's already-assigned 400 is a no-op");

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_crew_name_is_reported_not_sent() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let changes = Job::set_crew(
        &client,
        &CancellationToken::new(),
        "XZDO9T",
        &names(&["Nathan Thomas", "Brooklyn Thomas", "Nobody Known"]),
    )
    .await
    .unwrap();

    assert!(changes.is_noop());
    assert_eq!(changes.unresolved_names, names(&["Nobody Known"]));

    server.shutdown().await;
}

// =============================================================================
// Rate Limiting and Auth
// =============================================================================

#[tokio::test]
async fn test_quota_failures_are_retried_through() {
    let state = MockState::new()
        .with_member(Fixtures::member("1", "Nathan Thomas"))
        .with_quota_failures(3);
    let server = MockServer::with_state(state).await;
    let client = client_for(&server);

    let members = list_team(&client, &CancellationToken::new()).await.unwrap();

    assert_eq!(members.len(), 1);
    assert_eq!(server.state().read().await.quota_failures, 0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_quota_failures_beyond_budget_surface() {
    let state = MockState::new().with_quota_failures(10);
    let server = MockServer::with_state(state).await;
    let client = client_for(&server);

    let err = list_team(&client, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);
    assert_eq!(server.state().read().await.quota_failures, 3);

    server.shutdown().await;
}

// =============================================================================
// Listing and CRUD
// =============================================================================

#[tokio::test]
async fn test_list_all_pages_through_server() {
    let mut state = MockState::new();
    for n in 0..250 {
        state = state.with_job(Fixtures::scheduled_job(
            &format!("J{n:04}"),
            "2023-03-01 09:00:00",
        ));
    }
    let server = MockServer::with_state(state).await;
    let client = client_for(&server);

    let jobs = Job::list_all(
        &client,
        &CancellationToken::new(),
        &ListQuery::default(),
        DateRange::all(),
    )
    .await
    .unwrap();

    assert_eq!(jobs.len(), 250);

    server.shutdown().await;
}

#[tokio::test]
async fn test_list_scheduled_excludes_submitted_jobs() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    // XZDO9T is Submitted, QK2M7P is a scheduled Pending job.
    let jobs = Job::list_scheduled(&client, &CancellationToken::new(), Vec::new(), DateRange::all())
        .await
        .unwrap();

    let ids: Vec<&str> = jobs.iter().map(|j| j.uuid.as_str()).collect();
    assert_eq!(ids, vec!["QK2M7P"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_customer_create_then_get() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let cancel = CancellationToken::new();

    let id = Customer::create(&client, &cancel, Fixtures::customer("", "Alissa", "Thomas"))
        .await
        .unwrap();
    let customer = Customer::get(&client, &cancel, id.clone()).await.unwrap();

    assert_eq!(customer.id, id);
    assert_eq!(customer.full_name(), "Alissa Thomas");

    server.shutdown().await;
}
