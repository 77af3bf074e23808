use async_trait::async_trait;
use emotion_service::{
    Error, Result,
    classifier::{Prediction, TextClassifier, rank},
};
use std::sync::{Arc, Mutex};

/// Mock classifier for testing
#[derive(Debug)]
pub struct MockClassifier {
    pub predictions: Vec<Prediction>,
    pub requests: Arc<Mutex<Vec<(String, usize)>>>,
    pub error: Option<String>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            predictions: Vec::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_predictions(mut self, predictions: Vec<Prediction>) -> Self {
        self.predictions = predictions;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_requests(&self) -> Vec<(String, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextClassifier for MockClassifier {
    async fn classify(&self, text: &str, top_k: usize) -> Result<Vec<Prediction>> {
        self.requests.lock().unwrap().push((text.to_string(), top_k));

        if let Some(ref error) = self.error {
            return Err(Error::inference(error.clone()));
        }

        Ok(rank(self.predictions.clone(), top_k))
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Full distribution over the emotion labels, with joy on top
pub fn joyful_predictions() -> Vec<Prediction> {
    vec![
        Prediction::new("sadness", 0.0012),
        Prediction::new("joy", 0.9971),
        Prediction::new("love", 0.0007),
        Prediction::new("anger", 0.0005),
        Prediction::new("fear", 0.0003),
        Prediction::new("surprise", 0.0002),
    ]
}
