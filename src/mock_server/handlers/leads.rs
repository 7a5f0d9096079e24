//! Lead endpoint handlers.

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
use crate::{JobStatus, Lead};

/// Body of POST /lead/update/.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RescheduleLead {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub timezone: String,
    pub lead_date_time: DateTime<Utc>,
    pub lead_end_date_time: DateTime<Utc>,
}

/// Body of POST /lead/create/. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NewLead {
    pub lead_date_time: Option<DateTime<Utc>>,
    pub lead_end_date_time: Option<DateTime<Utc>>,
    pub client_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_type: String,
    pub timezone: String,
    pub lead_notes: String,
}

/// GET /{token}/lead/get/{uuid}/
pub async fn get_lead(
    State(state): State<SharedState>,
    Path((token, uuid)): Path<(String, String)>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let state = state.read().await;
    match state.leads.get(&uuid) {
        Some(lead) => data([lead]),
        None => no_records(),
    }
}

/// GET /{token}/lead/all/
pub async fn list_leads(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let listing = Listing::parse(&pairs);
    let state = state.read().await;
    listing.respond(state.list_leads(&listing.filter))
}

/// POST /{token}/lead/update/
pub async fn update_lead(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<RescheduleLead>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let mut state = state.write().await;
    match state.leads.get_mut(&body.uuid) {
        Some(lead) => {
            lead.lead_date_time = Some(body.lead_date_time);
            lead.lead_end_date_time = Some(body.lead_end_date_time);
            lead.timezone = body.timezone;
            data(json!([]))
        }
        None => failure(
            StatusCode::NOT_FOUND,
            "Not found",
            Some(json!([{ "error": format!("Lead {} not found", body.uuid) }])),
        ),
    }
}

/// POST /{token}/lead/create/
pub async fn create_lead(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<NewLead>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let lead = Lead {
        status: JobStatus::New,
        lead_date_time: body.lead_date_time,
        lead_end_date_time: body.lead_end_date_time,
        client_id: body.client_id,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        job_type: body.job_type,
        timezone: body.timezone,
        lead_notes: body.lead_notes,
        ..Default::default()
    };
    let client_id = lead.client_id;

    let uuid = state.write().await.create_lead(lead);
    data(json!([{ "UUID": uuid, "ClientId": client_id }]))
}
