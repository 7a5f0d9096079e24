//! Response classification.
//!
//! Maps a raw status code and body to a [`Verdict`]. The assignment
//! endpoints answer a repeated assign or unassign with a 400 validation
//! error; those two messages are treated as success here so they never
//! reach callers as failures.

use crate::envelope::ResponseEnvelope;
use crate::error::{Result, WorkizError};

/// Detail substrings the assignment endpoints use for no-op mutations.
pub const NOOP_DETAILS: [&str; 2] = ["User is already assigned", "User is not assigned"];

/// The classifier's interpretation of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The call succeeded, or was an already-applied crew mutation.
    Success,
    /// HTTP 401.
    AuthExpired { status: u16, message: String },
    /// HTTP 429.
    QuotaExceeded { status: u16, message: String },
    /// Any other failure status.
    Unexpected { status: u16, message: String },
}

impl Verdict {
    /// Returns true for [`Verdict::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Convert a failure verdict into the matching error.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Success => Ok(()),
            Self::AuthExpired { status, message } => {
                Err(WorkizError::AuthExpired { status, message })
            }
            Self::QuotaExceeded { status, message } => {
                Err(WorkizError::QuotaExceeded { status, message })
            }
            Self::Unexpected { status, message } => Err(WorkizError::ApiError { status, message }),
        }
    }
}

/// Classify a response by status code and body.
pub fn classify(status: u16, body: &str) -> Verdict {
    if status <= 399 {
        return Verdict::Success;
    }

    match status {
        401 => {
            return Verdict::AuthExpired {
                status,
                message: body.to_string(),
            }
        }
        429 => {
            return Verdict::QuotaExceeded {
                status,
                message: body.to_string(),
            }
        }
        _ => {}
    }

    let message = match serde_json::from_str::<ResponseEnvelope>(body) {
        Ok(envelope) => {
            let detail = envelope.detail_message();
            if envelope.code == 400 && NOOP_DETAILS.iter().any(|m| detail.contains(m)) {
                tracing::debug!(status, detail, "treating repeated crew change as success");
                return Verdict::Success;
            }
            format!("{} : {} : {}", detail, envelope.msg, body)
        }
        Err(e) => format!("unmarshal : {} : {}", e, body),
    };

    Verdict::Unexpected { status, message }
}
