use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_relay::config::{InferenceServerSettings, ServerSettings, Settings};
use inference_relay::startup::Application;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the relay on a random port, pointed at the given upstream.
    pub async fn spawn(upstream_url: String) -> Self {
        let config = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port for testing
            },
            inference_server: InferenceServerSettings {
                url: upstream_url,
                predict_timeout_secs: 5,
                health_timeout_secs: 2,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        TestApp { address, client }
    }
}

/// Serve the given router on an ephemeral port, returning its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener
        .local_addr()
        .expect("Failed to read mock upstream address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", addr)
}

/// Upstream that answers every prediction with a fixed result and reports
/// itself healthy.
pub fn healthy_upstream() -> Router {
    Router::new()
        .route(
            "/predict",
            post(|| async {
                Json(serde_json::json!({
                    "class_name": "cat",
                    "confidence": 0.97
                }))
            }),
        )
        .route(
            "/health",
            get(|| async {
                Json(serde_json::json!({
                    "status": "ok",
                    "model_loaded": true
                }))
            }),
        )
}

/// Upstream that rejects every prediction with the given status and body.
pub fn rejecting_upstream(status: u16, body: &'static str) -> Router {
    Router::new().route(
        "/predict",
        post(move || async move {
            (
                StatusCode::from_u16(status).expect("Invalid status code"),
                body,
            )
        }),
    )
}

/// Upstream whose health endpoint answers with the given status.
pub fn unhealthy_upstream(status: u16) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            (
                StatusCode::from_u16(status).expect("Invalid status code"),
                "unhealthy",
            )
        }),
    )
}

/// Upstream that fails exactly one prediction (by zero-based call index)
/// and succeeds on all others.
pub fn flaky_upstream(fail_index: usize) -> Router {
    let calls = Arc::new(AtomicUsize::new(0));
    Router::new().route(
        "/predict",
        post(move || {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == fail_index {
                    (StatusCode::INTERNAL_SERVER_ERROR, "model exploded").into_response()
                } else {
                    Json(serde_json::json!({
                        "class_name": "dog",
                        "confidence": 0.5
                    }))
                    .into_response()
                }
            }
        }),
    )
}

/// Base URL pointing at a port nothing listens on.
pub async fn unreachable_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener
        .local_addr()
        .expect("Failed to read probe listener address");
    drop(listener);
    format!("http://{}", addr)
}

/// Build a small multipart form with one in-memory image part.
pub fn image_form(filename: &str) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
        .file_name(filename.to_string())
        .mime_str("image/png")
        .expect("Failed to build multipart part");
    reqwest::multipart::Form::new().part("file", part)
}
