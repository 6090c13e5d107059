//! Network assembly: topology + parameters, persistence and validation
//!
//! A [`Network`] binds an immutable [`Topology`] to its mutable
//! [`ParameterSet`]. Construction always leaves the pair shape-consistent:
//! either the initializer fills the parameters from the topology, or
//! explicitly supplied parameters are validated against it.

mod backward;
mod forward;
mod init;
mod params;
mod trainer;

pub use forward::ForwardCache;
pub use init::initialize;
pub use params::{LayerParams, ParameterSet};
pub use trainer::Model;

use crate::dataset::Dataset;
use crate::error::{NetworkError, Result};
use crate::topology::Topology;
use crate::utils::SimpleRng;
use std::fs;
use std::path::Path;

/// A feed-forward network: topology plus trainable parameters.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    params: ParameterSet,
}

impl Network {
    /// Validate `topology` and initialize fresh parameters for it.
    pub fn new(topology: Topology, rng: &mut SimpleRng) -> Result<Self> {
        let params = initialize(&topology, rng)?;
        Ok(Self { topology, params })
    }

    /// Assemble a network from existing parameters, e.g. loaded from disk or
    /// fixed by a test. The shapes are checked against the topology.
    pub fn from_parts(topology: Topology, params: ParameterSet) -> Result<Self> {
        topology.validate()?;
        params.validate_against(&topology)?;
        Ok(Self { topology, params })
    }

    /// The network's immutable topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Current trainable parameters.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Mutable access to the parameters, for tests and external tooling.
    /// Shapes are re-checked on the next forward pass.
    pub fn params_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    /// Total number of trainable parameters.
    pub fn parameter_count(&self) -> usize {
        self.params.parameter_count()
    }

    /// Serialize the parameters to a JSON file.
    ///
    /// The format is the nested numeric structure of the parameter set
    /// itself (layer -> neuron -> weights, layer -> biases); a save/load
    /// round trip preserves exact floating-point values and shapes.
    pub fn save_parameters<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string(&self.params)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replace the parameters with the contents of a JSON file, validating
    /// the shapes against this network's topology.
    pub fn load_parameters<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let contents = fs::read_to_string(path)?;
        let params: ParameterSet = serde_json::from_str(&contents)?;
        params.validate_against(&self.topology)?;
        self.params = params;
        Ok(())
    }

    /// Check a dataset against this network's input/output widths.
    ///
    /// Called once per fit/evaluate, before the first epoch.
    pub fn validate_dataset(&self, dataset: &Dataset) -> Result<()> {
        if dataset.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        if dataset.inputs.len() != dataset.targets.len() {
            return Err(NetworkError::DatasetSizeMismatch {
                inputs: dataset.inputs.len(),
                targets: dataset.targets.len(),
            });
        }
        if dataset.inputs[0].len() != self.topology.inputs {
            return Err(NetworkError::ShapeMismatch {
                context: "dataset input width".to_string(),
                expected: self.topology.inputs,
                found: dataset.inputs[0].len(),
            });
        }
        if dataset.targets[0].len() != self.topology.output_width() {
            return Err(NetworkError::ShapeMismatch {
                context: "dataset target width".to_string(),
                expected: self.topology.output_width(),
                found: dataset.targets[0].len(),
            });
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
        Topology::new(3, LayerSpec::new(2, Activation::Softmax))
            .add_hidden(LayerSpec::new(4, Activation::Relu))
    }

    #[test]
    fn test_new_produces_consistent_shapes() {
        let mut rng = SimpleRng::new(42);
        let network = Network::new(topology(), &mut rng).unwrap();
        network.params().validate_against(network.topology()).unwrap();
        assert_eq!(network.parameter_count(), topology().parameter_count());
    }

    #[test]
    fn test_from_parts_rejects_mismatched_params() {
        let mut rng = SimpleRng::new(42);
        let other = Topology::new(5, LayerSpec::new(2, Activation::Sigmoid));
        let params = initialize(&other, &mut rng).unwrap();
        assert!(Network::from_parts(topology(), params).is_err());
    }

    #[test]
    fn test_validate_dataset_checks_widths() {
        let mut rng = SimpleRng::new(42);
        let network = Network::new(topology(), &mut rng).unwrap();

        let good = Dataset::new(vec![vec![0.0; 3]], vec![vec![0.0; 2]]).unwrap();
        assert!(network.validate_dataset(&good).is_ok());

        let narrow_input = Dataset::new(vec![vec![0.0; 2]], vec![vec![0.0; 2]]).unwrap();
        assert!(network.validate_dataset(&narrow_input).is_err());

        let wide_target = Dataset::new(vec![vec![0.0; 3]], vec![vec![0.0; 5]]).unwrap();
        assert!(network.validate_dataset(&wide_target).is_err());
    }
}
