//! Crew assign/unassign handlers.
//!
//! Repeating an assign or unassign is refused with a 400 whose detail the
//! client recognises as a no-op. Jobs report the detail as an object and
//! leads as a one-element array, so both shapes are exercised.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{admit, data, failure, SharedState};
use crate::mock_server::state::{CrewKind, CrewReject};

/// Body of the four crew endpoints.
#[derive(Debug, Deserialize)]
pub struct CrewChange {
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(rename = "User")]
    pub user: String,
}

/// POST /{token}/jobs/assign/
pub async fn assign_job(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<CrewChange>,
) -> Response {
    change_crew(state, token, CrewKind::Job, "assign", body).await
}

/// POST /{token}/jobs/unassign/
pub async fn unassign_job(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<CrewChange>,
) -> Response {
    change_crew(state, token, CrewKind::Job, "unassign", body).await
}

/// POST /{token}/lead/assign/
pub async fn assign_lead(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<CrewChange>,
) -> Response {
    change_crew(state, token, CrewKind::Lead, "assign", body).await
}

/// POST /{token}/lead/unassign/
pub async fn unassign_lead(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(body): Json<CrewChange>,
) -> Response {
    change_crew(state, token, CrewKind::Lead, "unassign", body).await
}

async fn change_crew(
    state: SharedState,
    token: String,
    kind: CrewKind,
    action: &'static str,
    body: CrewChange,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let result = state
        .write()
        .await
        .change_crew(kind, action, &body.uuid, &body.user);

    let entity = match kind {
        CrewKind::Job => "job",
        CrewKind::Lead => "lead",
    };
    let shaped = |message: String| -> Value {
        match kind {
            CrewKind::Job => json!({ "error": message }),
            CrewKind::Lead => json!([{ "error": message }]),
        }
    };

    match result {
        Ok(()) => data(json!([])),
        Err(CrewReject::AlreadyAssigned) => failure(
            StatusCode::BAD_REQUEST,
            "Validation error",
            Some(shaped(format!(
                "Cannot assign {} to {entity} {}, User is already assigned.",
                body.user, body.uuid
            ))),
        ),
        Err(CrewReject::NotAssigned) => failure(
            StatusCode::BAD_REQUEST,
            "Validation error",
            Some(shaped(format!(
                "Cannot unassign {} from {entity} {}, User is not assigned.",
                body.user, body.uuid
            ))),
        ),
        Err(CrewReject::UnknownUser) => failure(
            StatusCode::BAD_REQUEST,
            "Validation error",
            Some(shaped(format!("User {} does not exist.", body.user))),
        ),
        Err(CrewReject::UnknownEntity) => failure(
            StatusCode::NOT_FOUND,
            "Not found",
            Some(shaped(format!("{entity} {} not found", body.uuid))),
        ),
    }
}
