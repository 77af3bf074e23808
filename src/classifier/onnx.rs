//! Local sequence-classification inference with ONNX Runtime.
//!
//! The model, tokenizer and label map are loaded once. Tokenization and the
//! forward pass run on tokio's blocking pool.

use super::{Prediction, TextClassifier, label_probabilities, rank, softmax};
use crate::{Error, Result, config::OnnxClassifierConfig};
use async_trait::async_trait;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::Tensor,
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// Label order of `bert-base-uncased-emotion`.
pub const DEFAULT_LABELS: [&str; 6] = ["sadness", "joy", "love", "anger", "fear", "surprise"];

pub struct OnnxClassifier {
    // Running a session needs exclusive access.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    labels: Arc<Vec<String>>,
    uses_token_type_ids: bool,
}

#[derive(Debug, Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl OnnxClassifier {
    pub fn new(config: OnnxClassifierConfig) -> Result<Self> {
        let model_path = Path::new(&config.model_path);
        if !model_path.exists() {
            return Err(Error::config(format!(
                "ONNX model not found at {}",
                config.model_path
            )));
        }

        let session = Session::builder()
            .map_err(|e| Error::config(format!("Failed to create ONNX session: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::config(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(config.intra_threads)
            .map_err(|e| Error::config(format!("Failed to set intra threads: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| Error::config(format!("Failed to load ONNX model: {}", e)))?;

        let uses_token_type_ids =
            accepts_token_type_ids(session.inputs.iter().map(|input| input.name.as_str()));

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer_path).map_err(|e| {
            Error::config(format!(
                "Failed to load tokenizer from {}: {}",
                config.tokenizer_path, e
            ))
        })?;
        truncate_to(&mut tokenizer, config.max_length)?;

        let labels = match config.config_path {
            Some(ref path) => load_labels(Path::new(path))?,
            None => default_labels(),
        };

        info!(
            "Loaded ONNX classifier from {} with {} labels",
            config.model_path,
            labels.len()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            labels: Arc::new(labels),
            uses_token_type_ids,
        })
    }
}

/// BERT exports take `token_type_ids`; DistilBERT and RoBERTa exports do not.
fn accepts_token_type_ids<'a>(input_names: impl IntoIterator<Item = &'a str>) -> bool {
    input_names
        .into_iter()
        .any(|name| name == "token_type_ids")
}

fn truncate_to(tokenizer: &mut Tokenizer, max_length: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| Error::config(format!("Invalid truncation settings: {}", e)))?;
    Ok(())
}

/// Model inputs for a single sequence, as `[1, seq_len]` rows.
#[derive(Debug)]
struct EncodedText {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

impl EncodedText {
    fn seq_len(&self) -> usize {
        self.input_ids.len()
    }
}

fn encode(tokenizer: &Tokenizer, text: &str) -> Result<EncodedText> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| Error::inference(format!("Tokenization failed: {}", e)))?;

    let to_i64 = |values: &[u32]| values.iter().map(|&v| i64::from(v)).collect::<Vec<_>>();

    Ok(EncodedText {
        input_ids: to_i64(encoding.get_ids()),
        attention_mask: to_i64(encoding.get_attention_mask()),
        token_type_ids: to_i64(encoding.get_type_ids()),
    })
}

/// Logits → probabilities → labelled predictions, best first.
fn predictions_from_logits(labels: &[String], logits: &[f32], top_k: usize) -> Vec<Prediction> {
    let probabilities = softmax(logits);
    rank(label_probabilities(labels, &probabilities), top_k)
}

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|l| l.to_string()).collect()
}

fn load_labels(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    let model_config: ModelConfig = serde_json::from_str(&raw)?;
    labels_from_id2label(model_config.id2label)
}

fn labels_from_id2label(id2label: HashMap<String, String>) -> Result<Vec<String>> {
    if id2label.is_empty() {
        return Ok(default_labels());
    }

    let mut indexed = id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label))
                .map_err(|_| Error::config(format!("Invalid label id in id2label: {}", id)))
        })
        .collect::<Result<Vec<_>>>()?;
    indexed.sort_by_key(|(id, _)| *id);

    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

fn run_model(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    uses_token_type_ids: bool,
    text: &str,
) -> Result<Vec<f32>> {
    let encoded = encode(tokenizer, text)?;
    let seq_len = encoded.seq_len();

    let input_ids = Tensor::from_array(([1_usize, seq_len], encoded.input_ids))
        .map_err(|e| Error::inference(e.to_string()))?;
    let attention_mask = Tensor::from_array(([1_usize, seq_len], encoded.attention_mask))
        .map_err(|e| Error::inference(e.to_string()))?;

    let mut inputs = ort::inputs![
        "input_ids" => input_ids,
        "attention_mask" => attention_mask,
    ];
    if uses_token_type_ids {
        let token_type_ids = Tensor::from_array(([1_usize, seq_len], encoded.token_type_ids))
            .map_err(|e| Error::inference(e.to_string()))?;
        inputs.push(("token_type_ids".into(), token_type_ids.into()));
    }

    let mut session = session
        .lock()
        .map_err(|_| Error::internal("ONNX session lock poisoned"))?;
    let outputs = session
        .run(inputs)
        .map_err(|e| Error::inference(format!("ONNX inference failed: {}", e)))?;

    let (_, logits) = outputs[0]
        .try_extract_tensor::<f32>()
        .map_err(|e| Error::inference(e.to_string()))?;

    Ok(logits.to_vec())
}

#[async_trait]
impl TextClassifier for OnnxClassifier {
    async fn classify(&self, text: &str, top_k: usize) -> Result<Vec<Prediction>> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let uses_token_type_ids = self.uses_token_type_ids;
        let text = text.to_owned();

        let logits = tokio::task::spawn_blocking(move || {
            run_model(&session, &tokenizer, uses_token_type_ids, &text)
        })
        .await
        .map_err(|e| Error::internal(format!("Inference task failed: {}", e)))??;

        debug!("Model produced {} logits", logits.len());

        Ok(predictions_from_logits(&self.labels, &logits, top_k))
    }
}
