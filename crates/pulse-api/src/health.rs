use axum::{Json, extract::State};

use pulse_sync::RewriteBackend;
use pulse_types::api::HealthResponse;

use crate::AppState;

/// Reports configuration state only; never calls the remote.
pub async fn health<B: RewriteBackend>(State(state): State<AppState<B>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        mode: state.sync.configured_mode(),
    })
}
