use serde::{Deserialize, Serialize};

/// A single `(label, score)` pair produced by a text classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Numerically stable softmax. Every output lies in [0, 1] and the outputs sum to 1.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let Some(max) = logits.iter().copied().reduce(f32::max) else {
        return Vec::new();
    };

    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Sorts predictions by descending score and keeps the first `top_k`.
/// NaN scores sort last.
pub fn rank(mut predictions: Vec<Prediction>, top_k: usize) -> Vec<Prediction> {
    predictions.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b.score.total_cmp(&a.score),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });
    predictions.truncate(top_k);
    predictions
}

/// Pairs labels with probabilities; outputs beyond the label set are named `LABEL_<i>`.
pub fn label_probabilities(labels: &[String], probabilities: &[f32]) -> Vec<Prediction> {
    probabilities
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let label = labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{i}"));
            Prediction::new(label, f64::from(p))
        })
        .collect()
}
