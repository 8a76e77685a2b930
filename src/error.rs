use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure modes of the relay, mapped to response codes at the axum boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inference server could not be reached (connect failure or timeout).
    #[error("Cannot connect to inference server: {0}")]
    UpstreamUnreachable(String),

    /// The inference server answered with a non-200 status.
    #[error("Inference server error ({status})")]
    UpstreamRejected { status: u16, body: String },

    /// A server-local path given by the caller does not exist.
    #[error("Image file not found: {0}")]
    LocalResourceMissing(String),

    /// Anything else: malformed input, I/O failure reading an upload.
    #[error("Internal error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope {
            status: &'static str,
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status_code, message, details) = match self {
            RelayError::UpstreamUnreachable(cause) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Cannot connect to inference server: {}", cause),
                None,
            ),
            RelayError::UpstreamRejected { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Inference server error".to_string(),
                Some(body),
            ),
            RelayError::LocalResourceMissing(path) => (
                StatusCode::NOT_FOUND,
                format!("Image file not found: {}", path),
                None,
            ),
            RelayError::Unexpected(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", err),
                None,
            ),
        };

        (
            status_code,
            Json(ErrorEnvelope {
                status: "error",
                message,
                details,
            }),
        )
            .into_response()
    }
}
