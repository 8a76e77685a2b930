use axum::{response::IntoResponse, Json};
use serde_json::json;

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Client API Server",
        "endpoints": {
            "POST /classify": "Upload an image for classification",
            "POST /classify-from-path": "Classify image from server path",
            "POST /classify-batch": "Classify multiple images in one request",
            "GET /health": "Health check",
            "GET /inference-server-status": "Check inference server status"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "server": "client"
    }))
}
