//! Customer ("Client") endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::{admit, data, SharedState};
use crate::Customer;

/// GET /{token}/Client/get/{id}/
pub async fn get_customer(
    State(state): State<SharedState>,
    Path((token, id)): Path<(String, String)>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let state = state.read().await;
    match state.customers.get(&id) {
        Some(customer) => data(customer),
        None => (StatusCode::OK, Json(json!({ "flag": false, "data": {} }))).into_response(),
    }
}

/// POST /{token}/Client/create/
pub async fn create_customer(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(customer): Json<Customer>,
) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let id = state.write().await.create_customer(customer);
    data(json!([{ "client_id": id, "link": format!("https://app.workiz.com/root/client/{id}/info") }]))
}
