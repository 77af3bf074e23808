use super::{Prediction, TextClassifier, rank};
use crate::{Error, Result, config::HttpClassifierConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Classifier backed by a remote Hugging Face style text-classification endpoint.
pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: ClassificationParameters,
}

#[derive(Debug, Serialize)]
struct ClassificationParameters {
    top_k: usize,
}

/// The hosted inference API nests single-input results one level deeper
/// than most self-hosted servers do.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationOutput {
    Nested(Vec<Vec<Prediction>>),
    Flat(Vec<Prediction>),
}

impl ClassificationOutput {
    fn into_predictions(self) -> Vec<Prediction> {
        match self {
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(predictions) => predictions,
        }
    }
}

impl HttpClassifier {
    pub fn new(config: HttpClassifierConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::config("classifier.http.base_url must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextClassifier for HttpClassifier {
    async fn classify(&self, text: &str, top_k: usize) -> Result<Vec<Prediction>> {
        debug!(
            "Requesting classification of {} bytes from {}",
            text.len(),
            self.base_url
        );

        let body = ClassificationRequest {
            inputs: text,
            parameters: ClassificationParameters { top_k },
        };

        let mut request = self.client.post(&self.base_url).json(&body);
        if let Some(ref api_key) = self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::inference(format!(
                "classifier endpoint returned {}: {}",
                status, detail
            )));
        }

        let bytes = response.bytes().await?;
        let output: ClassificationOutput = serde_json::from_slice(&bytes).map_err(|e| {
            Error::inference(format!("unexpected classifier response: {}", e))
        })?;
        let predictions = rank(output.into_predictions(), top_k);

        debug!("Received {} predictions", predictions.len());

        Ok(predictions)
    }
}
