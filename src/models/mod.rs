use serde::{Deserialize, Serialize};

/// Payload returned by the inference server's predict operation.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub class_name: String,
    pub confidence: f64,
}

/// Response for a single uploaded image.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub status: &'static str,
    pub prediction: String,
    pub confidence: f64,
    pub source: &'static str,
}

/// Response for an image resolved from a server-local path.
#[derive(Debug, Serialize)]
pub struct PathClassifyResponse {
    pub status: &'static str,
    pub image_path: String,
    pub prediction: String,
    pub confidence: f64,
}

/// Outcome for one file within a batch request.
#[derive(Debug, Serialize)]
pub struct BatchItemResult {
    pub filename: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemResult {
    pub fn success(filename: String, prediction: Prediction) -> Self {
        Self {
            filename,
            status: "success",
            prediction: Some(prediction.class_name),
            confidence: Some(prediction.confidence),
            error: None,
        }
    }

    pub fn failure(filename: String, error: String) -> Self {
        Self {
            filename,
            status: "error",
            prediction: None,
            confidence: None,
            error: Some(error),
        }
    }
}

/// Aggregate batch response; `results` preserves input order.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub total: usize,
    pub results: Vec<BatchItemResult>,
}
