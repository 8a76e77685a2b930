use std::future::IntoFuture;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::handlers;
use crate::services::InferenceClient;

#[derive(Clone)]
pub struct AppState {
    pub inference_client: Arc<InferenceClient>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: Settings) -> anyhow::Result<Self> {
        let inference_client = Arc::new(InferenceClient::new(config.inference_server.clone()));
        let state = AppState { inference_client };

        let app = build_router(state);

        let address = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::app::index))
        .route("/health", get(handlers::app::health_check))
        .route("/classify", post(handlers::classify::classify))
        .route(
            "/classify-from-path",
            post(handlers::classify::classify_from_path),
        )
        .route("/classify-batch", post(handlers::classify::classify_batch))
        .route(
            "/inference-server-status",
            get(handlers::status::inference_server_status),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .with_state(state)
}
