//! Training loop: epochs, shuffling, mini-batches and validation
//!
//! A [`Model`] pairs a [`Network`] with a [`TrainingConfig`] and drives
//! mini-batch gradient descent. Dataset validation happens once before the
//! first epoch; each epoch shuffles the sample order with the caller's RNG
//! handle, partitions it into batches (the last batch may be smaller) and
//! runs the batched backward pass sequentially, so every batch's update is
//! visible to the next batch's forward pass. When a validation split is
//! configured the held-out mean loss is reported after every epoch.

use crate::config::TrainingConfig;
use crate::dataset::Dataset;
use crate::error::{NetworkError, Result};
use crate::network::Network;
use crate::utils::activations::Activation;
use crate::utils::losses::{categorical_cross_entropy, mean_squared_error};
use crate::utils::SimpleRng;
use log::info;

/// A network plus the hyperparameters used to train it.
pub struct Model {
    pub network: Network,
    pub config: TrainingConfig,
}

impl Model {
    /// Create a model, validating the training configuration up front.
    pub fn new(network: Network, config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { network, config })
    }

    /// Train on `dataset` with mini-batch gradient descent.
    ///
    /// When `validation_split` is configured, that fraction of the dataset is
    /// held out (shuffled split) before training and its mean loss is logged
    /// after every epoch. The loss follows the output activation:
    /// cross-entropy for Softmax outputs, mean squared error otherwise.
    ///
    /// # Errors
    ///
    /// Fails before the first epoch on an empty dataset, an input/target
    /// count mismatch or widths that disagree with the topology. Training is
    /// aborted, never retried, if a batch fails mid-epoch.
    pub fn fit(&mut self, dataset: &Dataset, rng: &mut SimpleRng) -> Result<()> {
        self.network.validate_dataset(dataset)?;

        let (train, validation) = match self.config.validation_split {
            Some(split) => {
                let (train, held_out) = dataset.split_with_shuffle(1.0 - split, rng)?;
                (train, Some(held_out))
            }
            None => (dataset.clone(), None),
        };
        if train.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }

        let mut indices: Vec<usize> = (0..train.len()).collect();
        for epoch in 1..=self.config.epochs {
            rng.shuffle(&mut indices);

            for batch in indices.chunks(self.config.batch_size) {
                let batch_inputs: Vec<&[f64]> =
                    batch.iter().map(|&i| train.inputs[i].as_slice()).collect();
                let batch_targets: Vec<&[f64]> =
                    batch.iter().map(|&i| train.targets[i].as_slice()).collect();
                self.network.backpropagate_batch(
                    &batch_inputs,
                    &batch_targets,
                    self.config.learning_rate,
                )?;
            }

            match &validation {
                Some(held_out) => {
                    let loss = self.evaluate(held_out)?;
                    info!(
                        "epoch {}/{}: validation loss {:.6}",
                        epoch, self.config.epochs, loss
                    );
                }
                None => info!("epoch {}/{} complete", epoch, self.config.epochs),
            }
        }
        Ok(())
    }

    /// Mean loss over a dataset using forward passes only.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<f64> {
        self.network.validate_dataset(dataset)?;

        let loss_fn = match self.network.topology().output.activation {
            Activation::Softmax => categorical_cross_entropy,
            _ => mean_squared_error,
        };

        let mut total = 0.0;
        for (input, target) in dataset.inputs.iter().zip(&dataset.targets) {
            let prediction = self.network.predict(input)?;
            total += loss_fn(&prediction, target)?;
        }
        Ok(total / dataset.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{LayerSpec, Topology};

    fn model(config: TrainingConfig) -> Model {
        let topology = Topology::new(2, LayerSpec::new(1, Activation::Sigmoid))
            .add_hidden(LayerSpec::new(3, Activation::Tanh));
        let mut rng = SimpleRng::new(42);
        let network = Network::new(topology, &mut rng).unwrap();
        Model::new(network, config).unwrap()
    }

    fn xor_dataset() -> Dataset {
        Dataset::new(
            vec![
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
            ],
            vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_fit_rejects_empty_dataset() {
        let mut model = model(TrainingConfig::default());
        let mut rng = SimpleRng::new(1);
        let err = model.fit(&Dataset::default(), &mut rng).unwrap_err();
        assert!(matches!(err, NetworkError::EmptyDataset));
    }

    #[test]
    fn test_fit_rejects_count_mismatch() {
        let mut model = model(TrainingConfig::default());
        let mut rng = SimpleRng::new(1);
        let dataset = Dataset {
            inputs: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            targets: vec![vec![1.0]],
        };
        let err = model.fit(&dataset, &mut rng).unwrap_err();
        assert!(matches!(err, NetworkError::DatasetSizeMismatch { .. }));
    }

    #[test]
    fn test_fit_rejects_input_width_mismatch() {
        let mut model = model(TrainingConfig::default());
        let mut rng = SimpleRng::new(1);
        let dataset = Dataset::new(vec![vec![0.0, 1.0, 2.0]], vec![vec![1.0]]).unwrap();
        let err = model.fit(&dataset, &mut rng).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_fit_reduces_training_loss() {
        let config = TrainingConfig {
            epochs: 200,
            learning_rate: 0.5,
            batch_size: 4,
            validation_split: None,
        };
        let mut model = model(config);
        let dataset = xor_dataset();
        let mut rng = SimpleRng::new(42);

        let before = model.evaluate(&dataset).unwrap();
        model.fit(&dataset, &mut rng).unwrap();
        let after = model.evaluate(&dataset).unwrap();
        assert!(
            after < before,
            "training should reduce loss: before {}, after {}",
            before,
            after
        );
    }

    #[test]
    fn test_fit_with_validation_split() {
        let config = TrainingConfig {
            epochs: 3,
            learning_rate: 0.1,
            batch_size: 2,
            validation_split: Some(0.25),
        };
        let mut model = model(config);
        let mut rng = SimpleRng::new(7);
        model.fit(&xor_dataset(), &mut rng).unwrap();
    }

    #[test]
    fn test_fit_is_deterministic_for_fixed_seed() {
        let config = TrainingConfig {
            epochs: 10,
            learning_rate: 0.3,
            batch_size: 2,
            validation_split: None,
        };
        let dataset = xor_dataset();

        let mut a = model(config.clone());
        let mut rng_a = SimpleRng::new(42);
        a.fit(&dataset, &mut rng_a).unwrap();

        let mut b = model(config);
        let mut rng_b = SimpleRng::new(42);
        b.fit(&dataset, &mut rng_b).unwrap();

        assert_eq!(a.network.params(), b.network.params());
    }
}
