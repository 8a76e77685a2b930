use std::time::Duration;

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::config::InferenceServerSettings;
use crate::error::RelayError;
use crate::models::Prediction;

/// Outcome of probing the inference server's health endpoint.
///
/// Probing never fails hard; every failure collapses into `Offline`.
#[derive(Debug)]
pub enum UpstreamHealth {
    Online(serde_json::Value),
    Error { status_code: u16 },
    Offline { error: String },
}

/// HTTP client for the ONNX inference server.
pub struct InferenceClient {
    client: Client,
    settings: InferenceServerSettings,
}

impl InferenceClient {
    pub fn new(settings: InferenceServerSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    /// Forward one file to the inference server's predict operation.
    ///
    /// Transport failures (connect errors, timeouts) become
    /// `UpstreamUnreachable`; non-200 answers become `UpstreamRejected`
    /// carrying the raw response body.
    pub async fn predict(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Prediction, RelayError> {
        let url = format!("{}/predict", self.settings.url);

        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .with_context(|| format!("Invalid content type: {}", content_type))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(Duration::from_secs(self.settings.predict_timeout_secs))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Failed to reach inference server");
                RelayError::UpstreamUnreachable(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            let prediction = response
                .json::<Prediction>()
                .await
                .context("Failed to decode prediction payload")?;
            Ok(prediction)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(url = %url, status = %status, "Inference server rejected request");
            Err(RelayError::UpstreamRejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Probe the inference server's health endpoint.
    pub async fn health(&self) -> UpstreamHealth {
        let url = format!("{}/health", self.settings.url);

        let response = match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.settings.health_timeout_secs))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Inference server unreachable");
                return UpstreamHealth::Offline {
                    error: e.to_string(),
                };
            }
        };

        if response.status() == StatusCode::OK {
            match response.json::<serde_json::Value>().await {
                Ok(payload) => UpstreamHealth::Online(payload),
                Err(e) => UpstreamHealth::Offline {
                    error: e.to_string(),
                },
            }
        } else {
            UpstreamHealth::Error {
                status_code: response.status().as_u16(),
            }
        }
    }
}
