//! The mock server process: one axum app on an ephemeral local port.

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::fixtures::Fixtures;
use super::handlers::{self, SharedState};
use super::state::MockState;
use crate::{RetryPolicy, WorkizClient};

/// Token the default client sends.
pub const MOCK_TOKEN: &str = "test-token";

/// Secret the default client sends.
pub const MOCK_SECRET: &str = "test-secret";

/// How long `shutdown` waits for open connections to drain.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// A running mock Workiz API.
///
/// State stays reachable through [`MockServer::state`], so a test can change
/// the team or inject quota failures between client calls.
pub struct MockServer {
    url: String,
    state: SharedState,
    stop: CancellationToken,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Serve the default scenario (see [`Fixtures::default_scenario`]).
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_scenario().into()).await
    }

    /// Serve no data at all.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Serve `state`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let state = state.shared();
        let listener = match TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(e) => panic!("mock server cannot bind a local port: {e}"),
        };
        let url = match listener.local_addr() {
            Ok(addr) => format!("http://{addr}"),
            Err(e) => panic!("mock server has no local address: {e}"),
        };

        let stop = CancellationToken::new();
        let app = routes().with_state(state.clone());
        let task = tokio::spawn({
            let stop = stop.clone();
            async move {
                let served = axum::serve(listener, app)
                    .with_graceful_shutdown(stop.cancelled_owned())
                    .await;
                if let Err(e) = served {
                    tracing::error!(error = %e, "mock server stopped");
                }
            }
        });

        tracing::debug!(%url, "mock server listening");
        Self {
            url,
            state,
            stop,
            task,
        }
    }

    /// Base URL to hand to [`WorkizClient::new`].
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The live server state.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// A client for this server using [`MOCK_TOKEN`], with millisecond
    /// retry delays.
    pub fn client(&self) -> crate::Result<WorkizClient> {
        Ok(WorkizClient::new(MOCK_TOKEN, MOCK_SECRET, &self.url)?.with_retry_policy(RetryPolicy {
            base_delay: Duration::from_millis(1),
            ..RetryPolicy::default()
        }))
    }

    /// Stop serving and close the port.
    pub async fn shutdown(self) {
        self.stop.cancel();
        let mut task = self.task;
        if tokio::time::timeout(DRAIN_TIMEOUT, &mut task).await.is_err() {
            task.abort();
            let _ = task.await;
        }
    }
}

/// The Workiz surface, every resource under the account token.
fn routes() -> Router<SharedState> {
    let api = Router::new()
        .route("/team/all/", get(handlers::list_team))
        .route("/jobs/get/:uuid/", get(handlers::get_job))
        .route("/jobs/all/", get(handlers::list_jobs))
        .route("/jobs/update/", post(handlers::update_job))
        .route("/jobs/create/", post(handlers::create_job))
        .route("/jobs/assign/", post(handlers::assign_job))
        .route("/jobs/unassign/", post(handlers::unassign_job))
        .route("/lead/get/:uuid/", get(handlers::get_lead))
        .route("/lead/all/", get(handlers::list_leads))
        .route("/lead/update/", post(handlers::update_lead))
        .route("/lead/create/", post(handlers::create_lead))
        .route("/lead/assign/", post(handlers::assign_lead))
        .route("/lead/unassign/", post(handlers::unassign_lead))
        .route("/Client/get/:id/", get(handlers::get_customer))
        .route("/Client/create/", post(handlers::create_customer));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/:token", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{list_team, ErrorKind, Get, Job};

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start_empty().await;

        let body = reqwest::get(format!("{}/health", server.url()))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_default_scenario_is_served() {
        let server = MockServer::start().await;
        let client = server.client().unwrap();

        let job = Job::get(&client, &CancellationToken::new(), "XZDO9T".to_string())
            .await
            .unwrap();
        assert_eq!(job.team.len(), 2);
        assert_eq!(server.state().read().await.members.len(), 3);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_wrong_token_is_auth_expired() {
        let server = MockServer::with_state(MockState::new().with_required_token("right-token")).await;
        let client = server.client().unwrap();

        let err = list_team(&client, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthExpired);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_job_on_empty_server() {
        let server = MockServer::start_empty().await;
        let client = server.client().unwrap();

        let err = Job::get(&client, &CancellationToken::new(), "nonexistent".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        server.shutdown().await;
    }
}
