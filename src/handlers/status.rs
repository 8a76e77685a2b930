use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::services::UpstreamHealth;
use crate::startup::AppState;

/// Report the inference server's state without ever failing the request.
pub async fn inference_server_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.inference_client.health().await {
        UpstreamHealth::Online(payload) => Json(json!({
            "inference_server": "online",
            "url": state.inference_client.base_url(),
            "response": payload,
        })),
        UpstreamHealth::Error { status_code } => Json(json!({
            "inference_server": "error",
            "status_code": status_code,
        })),
        UpstreamHealth::Offline { error } => Json(json!({
            "inference_server": "offline",
            "error": error,
        })),
    }
}
