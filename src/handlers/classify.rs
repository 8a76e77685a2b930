use std::path::Path;

use anyhow::Context;
use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::RelayError;
use crate::models::{BatchItemResult, BatchResponse, ClassifyResponse, PathClassifyResponse};
use crate::startup::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Forward one uploaded image to the inference server.
pub async fn classify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, RelayError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read multipart field: {}", e))?
        .ok_or_else(|| RelayError::Unexpected(anyhow::anyhow!("No file uploaded")))?;

    let filename = field.file_name().unwrap_or("unnamed").to_string();
    let content_type = field
        .content_type()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read file bytes: {}", e))?
        .to_vec();

    let prediction = state
        .inference_client
        .predict(&filename, &content_type, data)
        .await?;

    tracing::info!(
        filename = %filename,
        prediction = %prediction.class_name,
        confidence = %prediction.confidence,
        "Image classified"
    );

    Ok(Json(ClassifyResponse {
        status: "success",
        prediction: prediction.class_name,
        confidence: prediction.confidence,
        source: "ONNX Inference Server",
    }))
}

#[derive(Debug, Deserialize)]
pub struct ClassifyFromPathParams {
    pub image_path: String,
}

/// Classify an image already present on the relay's filesystem.
pub async fn classify_from_path(
    State(state): State<AppState>,
    Query(params): Query<ClassifyFromPathParams>,
) -> Result<Json<PathClassifyResponse>, RelayError> {
    let image_path = params.image_path;

    if !Path::new(&image_path).exists() {
        return Err(RelayError::LocalResourceMissing(image_path));
    }

    let data = tokio::fs::read(&image_path)
        .await
        .with_context(|| format!("Failed to read {}", image_path))?;

    let filename = Path::new(&image_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let prediction = state
        .inference_client
        .predict(&filename, "image/png", data)
        .await?;

    Ok(Json(PathClassifyResponse {
        status: "success",
        image_path,
        prediction: prediction.class_name,
        confidence: prediction.confidence,
    }))
}

/// Forward each uploaded file sequentially; one failing item never aborts
/// the rest, it is recorded as an error entry in input order.
pub async fn classify_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>, RelayError> {
    let mut results = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read multipart field: {}", e))?
    {
        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let data = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::error!(filename = %filename, error = %e, "Failed to read uploaded file");
                results.push(BatchItemResult::failure(
                    filename,
                    format!("Failed to read file: {}", e),
                ));
                continue;
            }
        };

        match state
            .inference_client
            .predict(&filename, &content_type, data)
            .await
        {
            Ok(prediction) => {
                results.push(BatchItemResult::success(filename, prediction));
            }
            Err(RelayError::UpstreamRejected { body, .. }) => {
                tracing::error!(filename = %filename, "Batch item rejected by inference server");
                results.push(BatchItemResult::failure(filename, body));
            }
            Err(e) => {
                tracing::error!(filename = %filename, error = %e, "Batch item failed");
                results.push(BatchItemResult::failure(filename, e.to_string()));
            }
        }
    }

    Ok(Json(BatchResponse {
        total: results.len(),
        results,
    }))
}
