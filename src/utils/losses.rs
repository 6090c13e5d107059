//! Loss functions for evaluation and output-gradient derivation
//!
//! Two losses are supported: mean squared error for regression-style outputs
//! and categorical cross-entropy for softmax outputs with one-hot targets.
//! Both reject length mismatches as fatal shape errors.

use crate::error::{NetworkError, Result};

/// Clip bound for cross-entropy so log never sees 0 or 1 exactly.
const CROSS_ENTROPY_EPSILON: f64 = 1e-15;

/// Mean squared error: mean((pred_i - target_i)^2).
pub fn mean_squared_error(predictions: &[f64], targets: &[f64]) -> Result<f64> {
    if predictions.len() != targets.len() {
        return Err(NetworkError::ShapeMismatch {
            context: "mean_squared_error predictions vs targets".to_string(),
            expected: targets.len(),
            found: predictions.len(),
        });
    }
    let sum: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t) * (p - t))
        .sum();
    Ok(sum / predictions.len() as f64)
}

/// Categorical cross-entropy: -sum(target_i * ln(clip(pred_i))).
///
/// Predictions are clipped to [ε, 1-ε] with ε = 1e-15 before taking the log.
/// Only entries with target_i > 0 contribute, which for one-hot targets means
/// a single term per sample.
pub fn categorical_cross_entropy(predictions: &[f64], targets: &[f64]) -> Result<f64> {
    if predictions.len() != targets.len() {
        return Err(NetworkError::ShapeMismatch {
            context: "categorical_cross_entropy predictions vs targets".to_string(),
            expected: targets.len(),
            found: predictions.len(),
        });
    }
    let mut loss = 0.0;
    for (&p, &t) in predictions.iter().zip(targets) {
        if t > 0.0 {
            let clipped = p.clamp(CROSS_ENTROPY_EPSILON, 1.0 - CROSS_ENTROPY_EPSILON);
            loss -= t * clipped.ln();
        }
    }
    Ok(loss)
}
