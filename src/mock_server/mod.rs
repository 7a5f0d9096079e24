//! Mock Workiz API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Workiz
//! API for integration and end-to-end testing. Unlike wiremock which mocks
//! at the HTTP level per-test, this server maintains state across requests,
//! enabling realistic workflow testing: crews that change between calls,
//! members renamed after they were assigned, and rate limits that clear.
//!
//! # Example
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//! use workiz::mock_server::MockServer;
//! use workiz::{Get, Job};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = server.client().unwrap();
//!     let cancel = CancellationToken::new();
//!
//!     // Server comes with default fixtures
//!     let job = Job::get(&client, &cancel, "XZDO9T".to_string()).await.unwrap();
//!     assert_eq!(job.team.len(), 2);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::{MockServer, MOCK_SECRET, MOCK_TOKEN};
pub use state::{CrewCall, CrewKind, CrewReject, ListFilter, MockState};
