//! Response envelopes.
//!
//! Every Workiz reply is wrapped in an outer JSON object. Error replies
//! carry a `details` field that arrives either as a single object or as a
//! list of objects; both normalize to one detail message.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// The error-side view of a Workiz reply.
///
/// Scalar fields sent as `null` read as their defaults.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    /// Success flag (set on successful replies).
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub flag: bool,

    /// Error flag (set on error replies).
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub error: bool,

    /// Numeric code, usually mirroring the HTTP status.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub code: i64,

    /// Human-readable message.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub msg: String,

    /// Error details in either of the two observed shapes.
    #[serde(default)]
    pub details: Option<Details>,
}

impl ResponseEnvelope {
    /// The normalized detail message, empty when none was sent.
    pub fn detail_message(&self) -> &str {
        self.details.as_ref().map_or("", Details::message)
    }
}

/// The polymorphic `details` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Details {
    /// `{"error": "..."}`
    Single(ErrorDetail),
    /// `[{"error": "..."}, ...]`
    List(Vec<ErrorDetail>),
}

impl Details {
    /// The first detail message; an empty list yields "".
    pub fn message(&self) -> &str {
        match self {
            Self::Single(detail) => &detail.error,
            Self::List(details) => details.first().map_or("", |d| d.error.as_str()),
        }
    }
}

/// One error detail entry.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub error: String,
}

/// The success-side view of a Workiz reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default)]
    pub flag: bool,

    pub data: T,

    /// Listing endpoints report whether more pages exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}
