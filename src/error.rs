//! Error types for Workiz API operations.

use std::fmt;

use thiserror::Error;

/// The closed set of failure categories.
///
/// Every [`WorkizError`] maps to exactly one kind, including errors that
/// were wrapped with request context on the way up. Match on the kind
/// rather than on error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credentials or client settings are missing or malformed.
    Config,
    /// Network or I/O failure before a complete response was read.
    Transport,
    /// The API token was rejected (HTTP 401).
    AuthExpired,
    /// The account hit its API quota (HTTP 429) and retries ran out.
    QuotaExceeded,
    /// A single-entity lookup matched nothing.
    NotFound,
    /// A single-entity lookup matched more than one record.
    AmbiguousResult,
    /// A listing hit the page cap before the server signalled the end.
    TooManyRecords,
    /// A success response did not have the expected shape.
    UnmarshalFailure,
    /// Anything else the remote service reported.
    Unexpected,
    /// The caller's cancellation token fired.
    Cancelled,
}

/// Errors that can occur during Workiz API operations.
#[derive(Debug, Error)]
pub enum WorkizError {
    /// Configuration is missing or incomplete.
    #[error("Workiz configuration required: {0}")]
    ConfigMissing(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// URL construction error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    EncodeError(#[source] serde_json::Error),

    /// Token rejected by the server.
    #[error("Unauthorized : {status} : {message}")]
    AuthExpired { status: u16, message: String },

    /// Rate limited by the server.
    #[error("Quota : {status} : {message}")]
    QuotaExceeded { status: u16, message: String },

    /// Entity not found.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// More than one entity returned for a single id.
    #[error("More than 1 {entity} found for id '{id}' ({count} records)")]
    AmbiguousResult {
        entity: &'static str,
        id: String,
        count: usize,
    },

    /// Pagination cap reached.
    #[error("received over {count} records in {range}")]
    TooManyRecords { count: usize, range: String },

    /// Response did not match the expected shape.
    #[error("Failed to parse response: {source} : {body}")]
    UnmarshalFailure {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// API request failed for a reason the client does not model.
    #[error("Workiz Error : {status} : {message}")]
    ApiError { status: u16, message: String },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// A failure annotated with the request that produced it.
    #[error("{path} : {body} : {source}")]
    Request {
        path: String,
        body: String,
        #[source]
        source: Box<WorkizError>,
    },
}

impl WorkizError {
    /// The category of this error, looking through request context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigMissing(_) => ErrorKind::Config,
            Self::HttpError(_) | Self::UrlError(_) => ErrorKind::Transport,
            Self::AuthExpired { .. } => ErrorKind::AuthExpired,
            Self::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AmbiguousResult { .. } => ErrorKind::AmbiguousResult,
            Self::TooManyRecords { .. } => ErrorKind::TooManyRecords,
            Self::UnmarshalFailure { .. } => ErrorKind::UnmarshalFailure,
            Self::EncodeError(_) | Self::ApiError { .. } => ErrorKind::Unexpected,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Request { source, .. } => source.kind(),
        }
    }

    /// Returns true if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// Attach the resource path and serialized body of the failing request.
    ///
    /// The `auth_secret` field of a JSON body is replaced before storing.
    pub(crate) fn with_request(self, path: &str, body: Option<&[u8]>) -> Self {
        Self::Request {
            path: path.to_string(),
            body: body.map(redacted).unwrap_or_default(),
            source: Box::new(self),
        }
    }
}

const SECRET_FIELD: &str = "auth_secret";

fn redacted(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(mut fields)) if fields.contains_key(SECRET_FIELD) => {
            fields.insert(SECRET_FIELD.to_string(), "[redacted]".into());
            serde_json::Value::Object(fields).to_string()
        }
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "config",
            Self::Transport => "transport",
            Self::AuthExpired => "auth expired",
            Self::QuotaExceeded => "quota exceeded",
            Self::NotFound => "not found",
            Self::AmbiguousResult => "ambiguous result",
            Self::TooManyRecords => "too many records",
            Self::UnmarshalFailure => "unmarshal failure",
            Self::Unexpected => "unexpected",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Result type alias for Workiz operations.
pub type Result<T> = core::result::Result<T, WorkizError>;
