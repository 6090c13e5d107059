//! Trainable parameter storage
//!
//! Parameters are stored as one independently shaped weight matrix plus one
//! bias vector per trainable layer. The "ragged" per-layer representation
//! keeps the shape invariants local: every weight row must match the width of
//! the previous layer, every bias vector the width of its own layer, and the
//! whole set can be checked against a [`Topology`] at any time.

use crate::error::{NetworkError, Result};
use crate::topology::Topology;
use serde::{Deserialize, Serialize};

/// Weights and biases of a single trainable layer.
///
/// `weights[j]` is the incoming weight row of neuron `j`, with one entry per
/// neuron of the previous layer (or per input for the first trainable layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerParams {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

/// All trainable parameters of a network, one [`LayerParams`] per layer in
/// forward order.
///
/// Created once by the initializer, then mutated in place by every gradient
/// update for the lifetime of training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub layers: Vec<LayerParams>,
}

impl ParameterSet {
    /// Total number of scalar parameters.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.iter().map(Vec::len).sum::<usize>() + l.biases.len())
            .sum()
    }

    /// Verify that every tensor shape exactly matches the adjacent layer
    /// widths of `topology`. A violated shape is fatal, never tolerated.
    pub fn validate_against(&self, topology: &Topology) -> Result<()> {
        if self.layers.len() != topology.trainable_layer_count() {
            return Err(NetworkError::ShapeMismatch {
                context: "parameter set layer count".to_string(),
                expected: topology.trainable_layer_count(),
                found: self.layers.len(),
            });
        }
        for (l, layer) in self.layers.iter().enumerate() {
            let neurons = topology.layer_spec(l).neurons;
            let fan_in = topology.fan_in(l);
            if layer.weights.len() != neurons {
                return Err(NetworkError::ShapeMismatch {
                    context: format!("weight rows of layer {}", l),
                    expected: neurons,
                    found: layer.weights.len(),
                });
            }
            if layer.biases.len() != neurons {
                return Err(NetworkError::ShapeMismatch {
                    context: format!("bias vector of layer {}", l),
                    expected: neurons,
                    found: layer.biases.len(),
                });
            }
            for (j, row) in layer.weights.iter().enumerate() {
                if row.len() != fan_in {
                    return Err(NetworkError::ShapeMismatch {
                        context: format!("weight row {} of layer {}", j, l),
                        expected: fan_in,
                        found: row.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::LayerSpec;
    use crate::utils::Activation;

    fn topology() -> Topology {
        Topology::new(2, LayerSpec::new(1, Activation::Sigmoid))
            .add_hidden(LayerSpec::new(2, Activation::Relu))
    }

    fn matching_params() -> ParameterSet {
        ParameterSet {
            layers: vec![
                LayerParams {
                    weights: vec![vec![0.1, 0.2], vec![0.3, 0.4]],
                    biases: vec![0.0, 0.0],
                },
                LayerParams {
                    weights: vec![vec![0.5, 0.6]],
                    biases: vec![0.0],
                },
            ],
        }
    }

    #[test]
    fn test_validate_matching_shapes() {
        assert!(matching_params().validate_against(&topology()).is_ok());
    }

    #[test]
    fn test_parameter_count() {
        // 2*2 + 2 + 1*2 + 1 = 9
        assert_eq!(matching_params().parameter_count(), 9);
        assert_eq!(topology().parameter_count(), 9);
    }

    #[test]
    fn test_validate_rejects_short_weight_row() {
        let mut params = matching_params();
        params.layers[0].weights[1] = vec![0.3];
        let err = params.validate_against(&topology()).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_validate_rejects_wrong_bias_length() {
        let mut params = matching_params();
        params.layers[1].biases = vec![0.0, 0.0];
        assert!(params.validate_against(&topology()).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_layer() {
        let mut params = matching_params();
        params.layers.pop();
        assert!(params.validate_against(&topology()).is_err());
    }
}
