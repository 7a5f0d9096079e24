//! Listing filters shared by jobs and leads.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pagination::{DateRange, PAGE_SIZE};

/// Workflow status of a job or lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// A new lead.
    New,
    /// Booked but not yet given a firm schedule.
    Submitted,
    Pending,
    InProgress,
    Done,
    Canceled,
    /// Any account-specific status.
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Submitted => "Submitted",
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Done => "Done",
            Self::Canceled => "Canceled",
            Self::Other(s) => s,
        }
    }

    /// Whether the status is a closed one.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Done | Self::Canceled)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "new" => Self::New,
            "Submitted" => Self::Submitted,
            "Pending" => Self::Pending,
            "In progress" => Self::InProgress,
            "Done" => Self::Done,
            "Canceled" => Self::Canceled,
            _ => Self::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side filters for job and lead listings.
///
/// With no statuses the server returns open records only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Statuses to include (repeatable `status` parameter).
    pub statuses: Vec<JobStatus>,
    /// Earliest date to include (`start_date`).
    pub start_date: Option<NaiveDate>,
}

impl ListQuery {
    /// Records without a firm schedule.
    #[must_use]
    pub fn unscheduled() -> Self {
        Self {
            statuses: vec![JobStatus::Submitted],
            start_date: None,
        }
    }

    /// Narrow the server-side date to the start of `range`.
    #[must_use]
    pub fn within(mut self, range: &DateRange) -> Self {
        self.start_date = range.start.map(|s| s.date_naive());
        self
    }

    /// Resource path with query string for one page.
    pub(crate) fn to_path(&self, resource: &str, offset: u32) -> String {
        let mut params = url::form_urlencoded::Serializer::new(String::new());
        params.append_pair("records", &PAGE_SIZE.to_string());
        params.append_pair("offset", &offset.to_string());
        params.append_pair(
            "only_open",
            if self.statuses.is_empty() { "true" } else { "false" },
        );
        for status in &self.statuses {
            params.append_pair("status", status.as_str());
        }
        if let Some(date) = self.start_date {
            params.append_pair("start_date", &date.format("%Y-%m-%d").to_string());
        }
        format!("{}?{}", resource, params.finish())
    }
}
