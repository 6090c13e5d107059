//! Configuration structures for training
//!
//! This module provides the training hyperparameter configuration and its
//! JSON file loader. Configuration is validated eagerly so a bad value fails
//! before the first epoch rather than mid-run.

use crate::error::{NetworkError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Training hyperparameters for mini-batch gradient descent.
///
/// # Example file
///
/// ```json
/// {
///   "epochs": 50,
///   "learning_rate": 0.05,
///   "batch_size": 16,
///   "validation_split": 0.2
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Number of full passes over the shuffled training set.
    pub epochs: usize,

    /// Step size for the gradient-descent update.
    pub learning_rate: f64,

    /// Mini-batch size; the last batch of an epoch may be smaller.
    pub batch_size: usize,

    /// Optional fraction of the dataset held out for per-epoch validation
    /// loss reporting. Must be strictly between 0 and 1 when present.
    #[serde(default)]
    pub validation_split: Option<f64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            learning_rate: 0.01,
            batch_size: 32,
            validation_split: None,
        }
    }
}

impl TrainingConfig {
    /// Check that every hyperparameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetworkError::InvalidConfig(
                "epochs must be greater than 0".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetworkError::InvalidConfig(
                "learning_rate must be positive and finite".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(NetworkError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if let Some(split) = self.validation_split {
            if !(split > 0.0 && split < 1.0) {
                return Err(NetworkError::InvalidConfig(
                    "validation_split must be strictly between 0 and 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Load a training configuration from a JSON file and validate it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
