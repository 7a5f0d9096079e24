//! Workiz API client.
//!
//! Low-level HTTP client that handles authentication, dispatch, retry and
//! response classification. Entity operations are implemented via traits on
//! the model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::classify::classify;
use crate::config::Config;
use crate::error::{Result, WorkizError};
use crate::retry::{send_with_retry, RetryPolicy};

const DEFAULT_API_URL: &str = "https://api.workiz.com/api/v1";
const USER_AGENT: &str = concat!("workiz/", env!("CARGO_PKG_VERSION"));
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Low-level Workiz API client.
///
/// Requests go to `<base>/<token>/<path>`; POST bodies carry the auth
/// secret themselves (see [`WorkizClient::secret`]).
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use workiz::WorkizClient;
///
/// # fn example() -> workiz::Result<()> {
/// // Create from environment variables
/// let client = WorkizClient::from_env()?;
///
/// // Or configure manually
/// let client = WorkizClient::new("api_token", "sec_secret", "https://api.workiz.com/api/v1")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WorkizClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    secret: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for WorkizClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkizClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl WorkizClient {
    /// Create a client from environment variables.
    ///
    /// Uses `WORKIZ_API_TOKEN` and `WORKIZ_API_SECRET`, and optionally
    /// `WORKIZ_API_URL` for the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential is not set.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        let base_url = env::var("WORKIZ_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&config.token, &config.secret, &base_url)
    }

    /// Create a client against the production API from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.token, &config.secret, DEFAULT_API_URL)
    }

    /// Create a new client with the provided credentials and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, secret: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(WorkizError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
            secret: secret.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the quota retry schedule.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The retry schedule in use.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The auth secret embedded in POST bodies.
    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("{}/{}", self.token, path))?)
    }

    /// Dispatch a request and deserialize the reply into `T`.
    ///
    /// The reply is only parsed when the classifier accepts it; a body that
    /// does not fit `T` fails with an unmarshal error carrying the body.
    #[tracing::instrument(skip(self, cancel, body))]
    pub async fn dispatch<B, T>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = encode(body).map_err(|e| e.with_request(path, None))?;
        let text = self
            .send_payload(cancel, method, path, payload.as_deref())
            .await?;

        serde_json::from_str(&text).map_err(|source| {
            WorkizError::UnmarshalFailure { source, body: text }
                .with_request(path, payload.as_deref())
        })
    }

    /// Dispatch a request and return the raw reply body.
    #[tracing::instrument(skip(self, cancel, body))]
    pub async fn send<B>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let payload = encode(body).map_err(|e| e.with_request(path, None))?;
        self.send_payload(cancel, method, path, payload.as_deref())
            .await
    }

    /// GET shorthand for [`WorkizClient::dispatch`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<T> {
        self.dispatch::<(), T>(cancel, Method::GET, path, None)
            .await
    }

    /// POST shorthand for [`WorkizClient::send`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &B,
    ) -> Result<String> {
        self.send(cancel, Method::POST, path, Some(body)).await
    }

    async fn send_payload(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
    ) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(WorkizError::Cancelled.with_request(path, payload));
        }

        send_with_retry(&self.retry, cancel, || {
            self.execute(cancel, method.clone(), path, payload)
        })
        .await
        .map_err(|e| e.with_request(path, payload))
    }

    /// One HTTP round trip, classified.
    async fn execute(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
    ) -> Result<String> {
        let url = self.endpoint(path)?;

        let mut request = self.http.request(method, url);
        if let Some(bytes) = payload {
            request = request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(bytes.to_vec());
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = tokio::select! {
            _ = cancel.cancelled() => return Err(WorkizError::Cancelled),
            result = exchange => result.map_err(WorkizError::HttpError)?,
        };

        classify(status, &text).into_result()?;
        Ok(text)
    }
}

fn encode<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<Vec<u8>>> {
    body.map(serde_json::to_vec)
        .transpose()
        .map_err(WorkizError::EncodeError)
}
