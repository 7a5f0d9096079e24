//! Job endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{admit, data, failure, no_records, Listing, SharedState};
use crate::{Job, JobStatus};

/// Body of POST /jobs/update/.
#[derive(Debug, Deserialize)]
pub struct RescheduleJob {
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(rename = "JobDateTime")]
    pub job_date_time: DateTime<Utc>,
}

/// Body of POST /jobs/create/. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NewJob {
    pub job_date_time: Option<DateTime<Utc>>,
    pub client_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub job_type: String,
    pub timezone: String,
    pub job_notes: String,
}

/// GET /{token}/jobs/get/{uuid}/
pub async fn get_job(
    State(state): State<SharedState>,
    Path((token, uuid)): Path<(String, String)>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let state = state.read().await;
    match state.jobs.get(&uuid) {
        Some(job) => data([job]),
        None => no_records(),
    }
}

/// GET /{token}/jobs/all/
pub async fn list_jobs(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let listing = Listing::parse(&pairs);
    let state = state.read().await;
    listing.respond(state.list_jobs(&listing.filter))
}

/// POST /{token}/jobs/update/
pub async fn update_job(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<RescheduleJob>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let mut state = state.write().await;
    match state.jobs.get_mut(&body.uuid) {
        Some(job) => {
            job.job_date_time = Some(body.job_date_time);
            data(json!([]))
        }
        None => failure(
            StatusCode::NOT_FOUND,
            "Not found",
            Some(json!({ "error": format!("Job {} not found", body.uuid) })),
        ),
    }
}

/// POST /{token}/jobs/create/
pub async fn create_job(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<NewJob>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let job = Job {
        status: JobStatus::Submitted,
        job_date_time: body.job_date_time,
        client_id: body.client_id,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        city: body.city,
        state: body.state,
        postal_code: body.postal_code,
        job_type: body.job_type,
        timezone: body.timezone,
        job_notes: body.job_notes,
        ..Default::default()
    };
    let client_id = job.client_id;

    let uuid = state.write().await.create_job(job);
    data(json!([{ "UUID": uuid, "ClientId": client_id }]))
}
