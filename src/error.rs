//! Error taxonomy shared by the whole crate
//!
//! Every failure is an eager, typed error: shape violations, empty or
//! inconsistent datasets, unsupported activation requests and bad
//! configuration all abort the current operation instead of being coerced
//! into a "best effort" result.

use crate::utils::Activation;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Debug, Error)]
pub enum NetworkError {
    /// A tensor dimension disagrees with the adjacent layer width or with
    /// the other half of a dataset pair.
    #[error("shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    /// An operation that needs at least one sample got none.
    #[error("dataset contains no samples")]
    EmptyDataset,

    /// Input and target counts disagree.
    #[error("dataset size mismatch: {inputs} inputs vs {targets} targets")]
    DatasetSizeMismatch { inputs: usize, targets: usize },

    /// An elementwise derivative (or apply) was requested for an activation
    /// that only exists at the vector level, i.e. Softmax outside the
    /// output layer.
    #[error("activation {0} is not supported in this position")]
    UnsupportedActivation(Activation),

    /// A hyperparameter or topology field failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A CSV cell or label could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
