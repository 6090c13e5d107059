//! Network topology description
//!
//! A [`Topology`] is the immutable, ordered description of a feed-forward
//! network: an input width, a sequence of hidden layer specs and one output
//! layer spec. Trainable layers are the hidden layers plus the output layer;
//! the input layer carries no parameters. Topologies can be built in code or
//! loaded from a JSON file, and are validated before any training starts.

use crate::error::{NetworkError, Result};
use crate::utils::Activation;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Variance-scaling weight initialization family for one layer.
///
/// `fan_in` is the width of the preceding layer (or the input width for the
/// first trainable layer), `fan_out` the width of the layer itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitKind {
    /// w ~ N(0, sqrt(2 / fan_in))
    KaimingNormal,
    /// w ~ U(-L, L) with L = sqrt(6 / fan_in)
    KaimingUniform,
    /// w ~ N(0, sqrt(2 / (fan_in + fan_out))). The default.
    #[default]
    XavierNormal,
    /// w ~ U(-L, L) with L = sqrt(6 / (fan_in + fan_out))
    XavierUniform,
}

/// Specification of one trainable layer: width, activation and init scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Number of neurons in the layer. Must be positive.
    pub neurons: usize,
    /// Activation applied to the layer's pre-activations.
    pub activation: Activation,
    /// Weight initialization scheme. Defaults to Xavier Normal when omitted
    /// in a topology file.
    #[serde(default)]
    pub init: InitKind,
}

impl LayerSpec {
    /// Create a layer spec with the default (Xavier Normal) initialization.
    pub fn new(neurons: usize, activation: Activation) -> Self {
        Self {
            neurons,
            activation,
            init: InitKind::default(),
        }
    }

    /// Create a layer spec with an explicit initialization scheme.
    pub fn with_init(neurons: usize, activation: Activation, init: InitKind) -> Self {
        Self {
            neurons,
            activation,
            init,
        }
    }
}

/// Ordered description of a feed-forward network.
///
/// # Example
///
/// ```
/// use gradnet::topology::{LayerSpec, Topology};
/// use gradnet::utils::Activation;
///
/// let topology = Topology::new(2, LayerSpec::new(1, Activation::Sigmoid))
///     .add_hidden(LayerSpec::new(2, Activation::Relu));
/// assert_eq!(topology.trainable_layer_count(), 2);
/// assert_eq!(topology.output_width(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Width of the input vector.
    pub inputs: usize,
    /// Hidden layer specs, in forward order.
    #[serde(default)]
    pub hidden: Vec<LayerSpec>,
    /// Output layer spec.
    pub output: LayerSpec,
}

impl Topology {
    /// Create a topology with no hidden layers.
    pub fn new(inputs: usize, output: LayerSpec) -> Self {
        Self {
            inputs,
            hidden: Vec::new(),
            output,
        }
    }

    /// Append a hidden layer before the output layer.
    pub fn add_hidden(mut self, layer: LayerSpec) -> Self {
        self.hidden.push(layer);
        self
    }

    /// Number of trainable layers (hidden layers plus the output layer).
    pub fn trainable_layer_count(&self) -> usize {
        self.hidden.len() + 1
    }

    /// Width of the output layer.
    pub fn output_width(&self) -> usize {
        self.output.neurons
    }

    /// Layer spec of the trainable layer at `index` (hidden layers first,
    /// output layer last).
    pub fn layer_spec(&self, index: usize) -> &LayerSpec {
        if index < self.hidden.len() {
            &self.hidden[index]
        } else {
            &self.output
        }
    }

    /// Fan-in of the trainable layer at `index`: the width of the previous
    /// layer, or the input width for the first trainable layer.
    pub fn fan_in(&self, index: usize) -> usize {
        if index == 0 {
            self.inputs
        } else {
            self.layer_spec(index - 1).neurons
        }
    }

    /// Iterate over trainable layer specs in forward order.
    pub fn trainable_specs(&self) -> impl Iterator<Item = &LayerSpec> {
        self.hidden.iter().chain(std::iter::once(&self.output))
    }

    /// Total number of trainable parameters (weights plus biases).
    pub fn parameter_count(&self) -> usize {
        (0..self.trainable_layer_count())
            .map(|l| {
                let spec = self.layer_spec(l);
                spec.neurons * self.fan_in(l) + spec.neurons
            })
            .sum()
    }

    /// Check the structural invariants: all neuron counts positive.
    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 {
            return Err(NetworkError::InvalidConfig(
                "input layer must have at least one neuron".to_string(),
            ));
        }
        for (i, layer) in self.hidden.iter().enumerate() {
            if layer.neurons == 0 {
                return Err(NetworkError::InvalidConfig(format!(
                    "hidden layer {} must have at least one neuron",
                    i
                )));
            }
        }
        if self.output.neurons == 0 {
            return Err(NetworkError::InvalidConfig(
                "output layer must have at least one neuron".to_string(),
            ));
        }
        Ok(())
    }

    /// Human-readable summary of the network structure.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Network summary:");
        let _ = writeln!(
            out,
            "  total layers: {} (1 input + {} hidden + 1 output)",
            self.hidden.len() + 2,
            self.hidden.len()
        );
        let _ = writeln!(out, "  input: {} neurons", self.inputs);
        for (i, layer) in self.hidden.iter().enumerate() {
            let _ = writeln!(
                out,
                "  hidden {}: {} neurons, {} activation",
                i + 1,
                layer.neurons,
                layer.activation
            );
        }
        let _ = writeln!(
            out,
            "  output: {} neurons, {} activation",
            self.output.neurons, self.output.activation
        );
        let _ = writeln!(out, "  trainable parameters: {}", self.parameter_count());
        out
    }
}

/// Load a topology from a JSON file and validate it.
///
/// # Example file
///
/// ```json
/// {
///   "inputs": 4,
///   "hidden": [
///     { "neurons": 8, "activation": "relu", "init": "kaiming_normal" }
///   ],
///   "output": { "neurons": 3, "activation": "softmax" }
/// }
/// ```
pub fn load_topology<P: AsRef<Path>>(path: P) -> Result<Topology> {
    let contents = fs::read_to_string(path)?;
    let topology: Topology = serde_json::from_str(&contents)?;
    topology.validate()?;
    Ok(topology)
}
