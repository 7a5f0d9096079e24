//! HTTP request handlers for the mock server.
//!
//! Every route sits under `/:token/`. Responses use the live service's
//! envelopes: `{flag, data, ...}` for success and
//! `{flag, error, code, msg, details}` for failures.

pub mod crew;
pub mod customers;
pub mod jobs;
pub mod leads;
pub mod team;

pub use crew::*;
pub use customers::*;
pub use jobs::*;
pub use leads::*;
pub use team::*;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::{ListFilter, MockState};
use crate::{JobStatus, PAGE_SIZE};

/// State handle every handler receives.
pub type SharedState = Arc<RwLock<MockState>>;

/// Reject a bad token with 401, or burn a pending quota failure with 429.
pub(crate) async fn admit(state: &SharedState, token: &str) -> Result<(), Response> {
    let mut state = state.write().await;

    if !state.accepts_token(token) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized", "msg": "Invalid API token" })),
        )
            .into_response());
    }

    if state.take_quota_failure() {
        return Err(failure(StatusCode::TOO_MANY_REQUESTS, "API limit reached", None));
    }

    Ok(())
}

/// `{flag: true, data}`.
pub(crate) fn data<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "flag": true, "data": data, "code": 200 })),
    )
        .into_response()
}

/// A lookup that matched nothing. The service answers these with 200.
pub(crate) fn no_records() -> Response {
    (StatusCode::OK, Json(json!({ "flag": false, "data": [] }))).into_response()
}

/// The failure envelope.
pub(crate) fn failure(status: StatusCode, msg: &str, details: Option<Value>) -> Response {
    let mut body = json!({
        "flag": false,
        "error": true,
        "code": status.as_u16(),
        "msg": msg,
    });
    if let Some(details) = details {
        body["details"] = details;
    }
    (status, Json(body)).into_response()
}

/// Listing parameters: `records`, `offset` (page index), `only_open`,
/// repeated `status`, `start_date`.
#[derive(Debug, Clone)]
pub(crate) struct Listing {
    pub filter: ListFilter,
    pub records: usize,
    pub offset: usize,
}

impl Listing {
    pub(crate) fn parse(pairs: &[(String, String)]) -> Self {
        let mut listing = Self {
            filter: ListFilter::default(),
            records: PAGE_SIZE as usize,
            offset: 0,
        };

        for (key, value) in pairs {
            match key.as_str() {
                "records" => listing.records = value.parse().unwrap_or(listing.records),
                "offset" => listing.offset = value.parse().unwrap_or(0),
                "only_open" => listing.filter.only_open = value == "true",
                "status" => listing.filter.statuses.push(JobStatus::from(value.as_str())),
                "start_date" => {
                    listing.filter.start_date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
                }
                _ => {}
            }
        }

        listing
    }

    /// One page of `items` in the listing envelope.
    pub(crate) fn respond<T: Serialize + Clone>(&self, items: Vec<&T>) -> Response {
        let found = items.len();
        let start = self.offset.saturating_mul(self.records).min(found);
        let end = start.saturating_add(self.records).min(found);

        let page: Vec<T> = items[start..end].iter().map(|item| (*item).clone()).collect();

        (
            StatusCode::OK,
            Json(json!({
                "flag": true,
                "data": page,
                "has_more": end < found,
                "found": page.len(),
                "code": 200,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_listing_parse() {
        let listing = Listing::parse(&pairs(&[
            ("records", "100"),
            ("offset", "2"),
            ("only_open", "false"),
            ("status", "Submitted"),
            ("status", "In progress"),
            ("start_date", "2023-02-01"),
        ]));

        assert_eq!(listing.records, 100);
        assert_eq!(listing.offset, 2);
        assert!(!listing.filter.only_open);
        assert_eq!(
            listing.filter.statuses,
            vec![JobStatus::Submitted, JobStatus::InProgress]
        );
        assert_eq!(listing.filter.start_date, NaiveDate::from_ymd_opt(2023, 2, 1));
    }
}
