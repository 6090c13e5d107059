//! Forward pass with activation caching
//!
//! Computes layer outputs from an input vector given the current parameters.
//! The cached variant additionally records every layer's activations and
//! pre-activations for a matching backward pass. Weight-row lengths are
//! checked against the current input length before every dot product; a
//! mismatch signals a corrupted or misconfigured parameter set and aborts
//! the pass.

use crate::error::{NetworkError, Result};
use crate::network::Network;
use crate::utils::activations::{softmax, Activation};

/// Per-sample record of a forward pass, consumed by backpropagation.
///
/// `activations[0]` is the raw input; `activations[l + 1]` and
/// `pre_activations[l]` belong to trainable layer `l`. The cache is created
/// fresh per forward pass and discarded after its matching gradient step.
#[derive(Debug, Clone)]
pub struct ForwardCache {
    pub activations: Vec<Vec<f64>>,
    pub pre_activations: Vec<Vec<f64>>,
}

impl Network {
    /// Compute the network output for a single input vector.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input, false).map(|(output, _)| output)
    }

    /// Compute the network output and keep the per-layer cache needed for
    /// backpropagation.
    pub fn predict_with_cache(&self, input: &[f64]) -> Result<(Vec<f64>, ForwardCache)> {
        let (output, cache) = self.forward(input, true)?;
        // forward always fills the cache when asked to
        Ok((output, cache.expect("cache requested but not built")))
    }

    /// Batched forward pass: the same computation applied independently to
    /// each sample, returning per-sample outputs and caches.
    pub fn predict_batch_with_cache(
        &self,
        inputs: &[&[f64]],
    ) -> Result<(Vec<Vec<f64>>, Vec<ForwardCache>)> {
        let mut outputs = Vec::with_capacity(inputs.len());
        let mut caches = Vec::with_capacity(inputs.len());
        for input in inputs {
            let (output, cache) = self.predict_with_cache(input)?;
            outputs.push(output);
            caches.push(cache);
        }
        Ok((outputs, caches))
    }

    fn forward(&self, input: &[f64], want_cache: bool) -> Result<(Vec<f64>, Option<ForwardCache>)> {
        let layer_count = self.params.layers.len();
        let mut cache = want_cache.then(|| ForwardCache {
            activations: Vec::with_capacity(layer_count + 1),
            pre_activations: Vec::with_capacity(layer_count),
        });
        if let Some(cache) = cache.as_mut() {
            cache.activations.push(input.to_vec());
        }

        let mut x = input.to_vec();
        for (l, layer) in self.params.layers.iter().enumerate() {
            let spec = self.topology.layer_spec(l);

            let mut z = vec![0.0; layer.biases.len()];
            for (j, (row, bias)) in layer.weights.iter().zip(&layer.biases).enumerate() {
                if row.len() != x.len() {
                    return Err(NetworkError::ShapeMismatch {
                        context: format!("weight row {} of layer {}", j, l),
                        expected: x.len(),
                        found: row.len(),
                    });
                }
                z[j] = dot(row, &x) + bias;
            }

            // Softmax normalizes the whole pre-activation vector at once;
            // everything else is elementwise.
            let a = match spec.activation {
                Activation::Softmax => softmax(&z),
                act => z.iter().map(|&v| act.apply(v)).collect::<Result<Vec<f64>>>()?,
            };

            if let Some(cache) = cache.as_mut() {
                cache.pre_activations.push(z);
                cache.activations.push(a.clone());
            }
            x = a;
        }

        Ok((x, cache))
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
