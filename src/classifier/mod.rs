mod http;
#[cfg(feature = "onnx")]
mod onnx;
mod types;

pub use http::HttpClassifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use types::*;

use crate::{
    Error, Result,
    config::{ClassifierBackend, ClassifierConfig},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Maps a text to a ranked list of predictions over a fixed label set.
///
/// Implementations return at most `top_k` predictions, highest score first.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str, top_k: usize) -> Result<Vec<Prediction>>;
}

/// Builds the configured classifier. Called once at startup; the returned
/// handle is shared by every request.
pub fn from_config(config: &ClassifierConfig) -> Result<Arc<dyn TextClassifier>> {
    match config.backend {
        ClassifierBackend::Http => {
            let http = config.http.clone().ok_or_else(|| {
                Error::config("classifier.backend is 'http' but classifier.http is missing")
            })?;
            info!("Using HTTP classifier at {}", http.base_url);
            Ok(Arc::new(HttpClassifier::new(http)?))
        }
        ClassifierBackend::Onnx => build_onnx(config),
    }
}

#[cfg(feature = "onnx")]
fn build_onnx(config: &ClassifierConfig) -> Result<Arc<dyn TextClassifier>> {
    let onnx = config.onnx.clone().ok_or_else(|| {
        Error::config("classifier.backend is 'onnx' but classifier.onnx is missing")
    })?;
    info!("Using ONNX classifier from {}", onnx.model_path);
    Ok(Arc::new(OnnxClassifier::new(onnx)?))
}

#[cfg(not(feature = "onnx"))]
fn build_onnx(_config: &ClassifierConfig) -> Result<Arc<dyn TextClassifier>> {
    Err(Error::config(
        "classifier.backend 'onnx' requires building with the 'onnx' feature",
    ))
}
