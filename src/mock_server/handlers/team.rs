//! Team endpoint handlers.

use axum::{
    extract::{Path, State},
    response::Response,
};

use super::{admit, data, SharedState};

/// GET /{token}/team/all/
pub async fn list_team(State(state): State<SharedState>, Path(token): Path<String>) -> Response {
    if let Err(rejected) = admit(&state, &token).await {
        return rejected;
    }

    let state = state.read().await;
    data(&state.members)
}
