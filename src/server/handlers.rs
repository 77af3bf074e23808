use super::types::{DetectEmotionRequest, DetectEmotionResponse, ErrorResponse};
use crate::{Error, classifier::TextClassifier};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Only the single best label is returned to callers.
const TOP_K: usize = 1;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn TextClassifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self { classifier }
    }
}

pub async fn detect_emotion(
    State(state): State<AppState>,
    Json(request): Json<DetectEmotionRequest>,
) -> Result<Json<DetectEmotionResponse>, (StatusCode, Json<ErrorResponse>)> {
    debug!(
        "Received emotion detection request ({} bytes)",
        request.text.len()
    );

    let top = state
        .classifier
        .classify(&request.text, TOP_K)
        .await
        .and_then(|predictions| {
            predictions
                .into_iter()
                .next()
                .ok_or_else(|| Error::inference("classifier returned no predictions"))
        });

    match top {
        Ok(prediction) => {
            info!(
                "Emotion detected: {} (score: {})",
                prediction.label, prediction.score
            );
            Ok(Json(DetectEmotionResponse {
                emotion: prediction.label,
                score: prediction.score,
            }))
        }
        Err(e) => {
            error!("Failed to detect emotion: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
