use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DetectEmotionRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DetectEmotionResponse {
    pub emotion: String,
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
