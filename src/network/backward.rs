//! Batched backpropagation and gradient-descent update
//!
//! Gradients are hand-derived per activation/loss pair and averaged over the
//! mini-batch. The output-layer delta is `prediction - target` when the
//! output activation is Softmax (the combined Softmax + cross-entropy
//! gradient), otherwise `(prediction - target) * activation'(z)`. Hidden
//! deltas contract the next layer's deltas against that layer's weight
//! matrix with transpose indexing. All gradients for the batch are computed
//! against the unmodified parameters; the update is applied only afterwards.

use crate::error::{NetworkError, Result};
use crate::network::Network;
use crate::utils::activations::Activation;

impl Network {
    /// Single-sample gradient step: a mini-batch of one.
    pub fn backpropagate(&mut self, input: &[f64], target: &[f64], learning_rate: f64) -> Result<()> {
        self.backpropagate_batch(&[input], &[target], learning_rate)
    }

    /// Run one mini-batch gradient-descent step.
    ///
    /// Performs a cached forward pass per sample, derives per-layer deltas
    /// from output to input, accumulates weight/bias gradients, averages
    /// them over the batch and applies `param -= learning_rate * grad`.
    ///
    /// # Errors
    ///
    /// Fails eagerly on an empty batch, an input/target count mismatch, a
    /// target width that disagrees with the output layer, any shape
    /// violation found during the forward pass, or a derivative request for
    /// an unsupported activation (Softmax outside the output layer).
    pub fn backpropagate_batch(
        &mut self,
        inputs: &[&[f64]],
        targets: &[&[f64]],
        learning_rate: f64,
    ) -> Result<()> {
        if inputs.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        if inputs.len() != targets.len() {
            return Err(NetworkError::DatasetSizeMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }

        let layer_count = self.params.layers.len();
        let last = layer_count - 1;
        let output_width = self.topology.output_width();

        // Gradient accumulators shaped exactly like the parameters.
        let mut grad_w: Vec<Vec<Vec<f64>>> = self
            .params
            .layers
            .iter()
            .map(|l| l.weights.iter().map(|row| vec![0.0; row.len()]).collect())
            .collect();
        let mut grad_b: Vec<Vec<f64>> = self
            .params
            .layers
            .iter()
            .map(|l| vec![0.0; l.biases.len()])
            .collect();

        for (input, target) in inputs.iter().zip(targets) {
            if target.len() != output_width {
                return Err(NetworkError::ShapeMismatch {
                    context: "batch target width".to_string(),
                    expected: output_width,
                    found: target.len(),
                });
            }

            let (prediction, cache) = self.predict_with_cache(input)?;

            let mut deltas: Vec<Vec<f64>> = vec![Vec::new(); layer_count];

            // Output-layer delta.
            let out_activation = self.topology.layer_spec(last).activation;
            let z_out = &cache.pre_activations[last];
            let mut delta_out = vec![0.0; output_width];
            for j in 0..output_width {
                let diff = prediction[j] - target[j];
                delta_out[j] = match out_activation {
                    // Combined Softmax + cross-entropy gradient; no separate
                    // softmax derivative exists or is wanted here.
                    Activation::Softmax => diff,
                    act => diff * act.derivative(z_out[j])?,
                };
            }
            deltas[last] = delta_out;

            // Hidden deltas, last hidden layer first. weight[k][j] connects
            // neuron j of this layer to neuron k of the next.
            for l in (0..last).rev() {
                let next_weights = &self.params.layers[l + 1].weights;
                let next_delta = &deltas[l + 1];
                let z = &cache.pre_activations[l];
                let activation = self.topology.layer_spec(l).activation;

                let mut delta = vec![0.0; z.len()];
                for (j, delta_j) in delta.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    for (k, row) in next_weights.iter().enumerate() {
                        sum += next_delta[k] * row[j];
                    }
                    *delta_j = sum * activation.derivative(z[j])?;
                }
                deltas[l] = delta;
            }

            // Accumulate gradients against the previous layer's activations
            // (the raw input for the first trainable layer).
            for l in 0..layer_count {
                let prev_activations = &cache.activations[l];
                for (j, &d) in deltas[l].iter().enumerate() {
                    for (k, &a) in prev_activations.iter().enumerate() {
                        grad_w[l][j][k] += d * a;
                    }
                    grad_b[l][j] += d;
                }
            }
        }

        // Averaged update, applied only after the whole batch is processed.
        let scale = learning_rate / inputs.len() as f64;
        for (l, layer) in self.params.layers.iter_mut().enumerate() {
            for (j, row) in layer.weights.iter_mut().enumerate() {
                for (k, w) in row.iter_mut().enumerate() {
                    *w -= scale * grad_w[l][j][k];
                }
            }
            for (j, b) in layer.biases.iter_mut().enumerate() {
                *b -= scale * grad_b[l][j];
            }
        }
        Ok(())
    }
}
