//! Activation functions for neural networks
//!
//! This module provides the closed set of supported activations:
//! - ReLU, Sigmoid and Tanh as elementwise functions of the pre-activation
//! - Softmax as a vector-level function over a whole layer
//!
//! Derivatives are taken with respect to the pre-activation value z. Softmax
//! has no elementwise derivative here: it is only ever paired with
//! categorical cross-entropy, whose combined gradient collapses to
//! `prediction - target` in the backward pass.

use crate::error::{NetworkError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activation kind attached to a trainable layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    /// Vector-level softmax; only valid as an output-layer activation
    /// paired with categorical cross-entropy.
    Softmax,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::Softmax => "softmax",
        };
        f.write_str(name)
    }
}

impl Activation {
    /// Apply the activation elementwise to a pre-activation value.
    ///
    /// Softmax cannot be applied elementwise and returns
    /// [`NetworkError::UnsupportedActivation`]; the forward pass applies it
    /// through [`softmax`] over the whole layer instead.
    pub fn apply(self, z: f64) -> Result<f64> {
        match self {
            Activation::Relu => Ok(if z > 0.0 { z } else { 0.0 }),
            Activation::Sigmoid => Ok(sigmoid(z)),
            Activation::Tanh => Ok(z.tanh()),
            Activation::Softmax => Err(NetworkError::UnsupportedActivation(self)),
        }
    }

    /// Derivative with respect to the pre-activation value z.
    ///
    /// - ReLU': 1 if z > 0, else 0
    /// - Sigmoid': s(z) * (1 - s(z))
    /// - Tanh': 1 - tanh(z)^2
    ///
    /// Requesting the derivative of Softmax is an unsupported operation:
    /// outside the cross-entropy pairing there is no correct elementwise
    /// derivative to hand out.
    pub fn derivative(self, z: f64) -> Result<f64> {
        match self {
            Activation::Relu => Ok(if z > 0.0 { 1.0 } else { 0.0 }),
            Activation::Sigmoid => {
                let s = sigmoid(z);
                Ok(s * (1.0 - s))
            }
            Activation::Tanh => Ok(1.0 - z.tanh().powi(2)),
            Activation::Softmax => Err(NetworkError::UnsupportedActivation(self)),
        }
    }
}

/// Sigmoid function: 1 / (1 + exp(-x)).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Softmax over a whole pre-activation vector.
///
/// Uses the max-subtraction trick for numerical stability, so large logits
/// do not overflow: `exp(z_i - max(z)) / sum_j exp(z_j - max(z))`.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_relu_apply() {
        assert_eq!(Activation::Relu.apply(-2.0).unwrap(), 0.0);
        assert_eq!(Activation::Relu.apply(0.0).unwrap(), 0.0);
        assert_eq!(Activation::Relu.apply(3.5).unwrap(), 3.5);
    }

    #[test]
    fn test_relu_derivative() {
        assert_eq!(Activation::Relu.derivative(-1.0).unwrap(), 0.0);
        assert_eq!(Activation::Relu.derivative(0.0).unwrap(), 0.0);
        assert_eq!(Activation::Relu.derivative(0.1).unwrap(), 1.0);
    }

    #[test]
    fn test_sigmoid_at_zero() {
        assert_relative_eq!(Activation::Sigmoid.apply(0.0).unwrap(), 0.5);
    }

    #[test]
    fn test_sigmoid_derivative_at_zero() {
        // s(0) = 0.5, so s'(0) = 0.25
        assert_relative_eq!(Activation::Sigmoid.derivative(0.0).unwrap(), 0.25);
    }

    #[test]
    fn test_tanh_derivative() {
        let z: f64 = 0.7;
        let expected = 1.0 - z.tanh() * z.tanh();
        assert_relative_eq!(Activation::Tanh.derivative(z).unwrap(), expected);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let out = softmax(&[1.0, 2.0, 3.0]);
        let sum: f64 = out.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        assert!(out.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_softmax_numerical_stability() {
        let out = softmax(&[1000.0, 1001.0, 1002.0]);
        let sum: f64 = out.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        assert!(!out.iter().any(|p| p.is_nan() || p.is_infinite()));
    }

    #[test]
    fn test_softmax_uniform_input() {
        let out = softmax(&[0.5, 0.5, 0.5, 0.5]);
        for p in out {
            assert_relative_eq!(p, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_softmax_elementwise_apply_rejected() {
        assert!(matches!(
            Activation::Softmax.apply(1.0),
            Err(crate::error::NetworkError::UnsupportedActivation(_))
        ));
    }

    #[test]
    fn test_softmax_derivative_rejected() {
        assert!(matches!(
            Activation::Softmax.derivative(1.0),
            Err(crate::error::NetworkError::UnsupportedActivation(_))
        ));
    }
}
