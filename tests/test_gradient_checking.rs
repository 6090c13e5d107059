// Numerical gradient checking: the analytic gradients applied by the
// backward pass must agree with central finite differences of the loss the
// deltas are derived from. The analytic gradient is recovered from a single
// update as (old - new) / learning_rate, which is exact because the update
// rule is linear in the gradient.

use approx::assert_relative_eq;
use gradnet::network::{LayerParams, Network, ParameterSet};
use gradnet::topology::{LayerSpec, Topology};
use gradnet::utils::Activation;

const H: f64 = 1e-6;
const LR: f64 = 1.0;

fn sigmoid_net() -> Network {
    let topology = Topology::new(2, LayerSpec::new(1, Activation::Sigmoid))
        .add_hidden(LayerSpec::new(2, Activation::Tanh));
    let params = ParameterSet {
        layers: vec![
            LayerParams {
                weights: vec![vec![0.3, -0.2], vec![0.1, 0.4]],
                biases: vec![0.05, -0.1],
            },
            LayerParams {
                weights: vec![vec![0.7, -0.5]],
                biases: vec![0.2],
            },
        ],
    };
    Network::from_parts(topology, params).unwrap()
}

fn softmax_net() -> Network {
    let topology = Topology::new(2, LayerSpec::new(3, Activation::Softmax))
        .add_hidden(LayerSpec::new(2, Activation::Relu));
    let params = ParameterSet {
        layers: vec![
            LayerParams {
                weights: vec![vec![0.4, 0.3], vec![-0.2, 0.6]],
                biases: vec![0.1, 0.1],
            },
            LayerParams {
                weights: vec![vec![0.5, -0.4], vec![0.2, 0.3], vec![-0.1, 0.8]],
                biases: vec![0.0, 0.1, -0.1],
            },
        ],
    };
    Network::from_parts(topology, params).unwrap()
}

// Loss whose gradient the non-softmax output delta implements:
// E = 0.5 * sum((p_j - t_j)^2).
fn half_squared_error(prediction: &[f64], target: &[f64]) -> f64 {
    prediction
        .iter()
        .zip(target)
        .map(|(p, t)| 0.5 * (p - t) * (p - t))
        .sum()
}

// Loss paired with softmax outputs: cross-entropy over one-hot targets.
fn cross_entropy(prediction: &[f64], target: &[f64]) -> f64 {
    prediction
        .iter()
        .zip(target)
        .filter(|(_, &t)| t > 0.0)
        .map(|(p, t)| -t * p.ln())
        .sum()
}

fn check_all_weight_gradients(
    base: &Network,
    input: &[f64],
    target: &[f64],
    loss: fn(&[f64], &[f64]) -> f64,
) {
    // Analytic gradients via one update step.
    let mut updated = base.clone();
    updated.backpropagate(input, target, LR).unwrap();

    for l in 0..base.params().layers.len() {
        for j in 0..base.params().layers[l].weights.len() {
            for k in 0..base.params().layers[l].weights[j].len() {
                let old = base.params().layers[l].weights[j][k];
                let new = updated.params().layers[l].weights[j][k];
                let analytic = (old - new) / LR;

                let mut plus = base.clone();
                plus.params_mut().layers[l].weights[j][k] = old + H;
                let mut minus = base.clone();
                minus.params_mut().layers[l].weights[j][k] = old - H;

                let loss_plus = loss(&plus.predict(input).unwrap(), target);
                let loss_minus = loss(&minus.predict(input).unwrap(), target);
                let numeric = (loss_plus - loss_minus) / (2.0 * H);

                assert_relative_eq!(analytic, numeric, epsilon = 1e-5, max_relative = 1e-4);
            }
        }
        for j in 0..base.params().layers[l].biases.len() {
            let old = base.params().layers[l].biases[j];
            let new = updated.params().layers[l].biases[j];
            let analytic = (old - new) / LR;

            let mut plus = base.clone();
            plus.params_mut().layers[l].biases[j] = old + H;
            let mut minus = base.clone();
            minus.params_mut().layers[l].biases[j] = old - H;

            let loss_plus = loss(&plus.predict(input).unwrap(), target);
            let loss_minus = loss(&minus.predict(input).unwrap(), target);
            let numeric = (loss_plus - loss_minus) / (2.0 * H);

            assert_relative_eq!(analytic, numeric, epsilon = 1e-5, max_relative = 1e-4);
        }
    }
}

#[test]
fn test_gradients_sigmoid_output_squared_error() {
    let network = sigmoid_net();
    check_all_weight_gradients(&network, &[0.6, -0.3], &[1.0], half_squared_error);
}

#[test]
fn test_gradients_softmax_output_cross_entropy() {
    // ReLU hidden pre-activations here are well away from zero, so the
    // finite-difference probe never crosses the kink.
    let network = softmax_net();
    check_all_weight_gradients(&network, &[1.0, 0.5], &[0.0, 1.0, 0.0], cross_entropy);
}
