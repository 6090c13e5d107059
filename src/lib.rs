//! gradnet — a small feed-forward neural-network engine
//!
//! This library implements a from-scratch feed-forward network: topology
//! description, variance-scaling parameter initialization, a forward pass
//! with activation caching, hand-derived batched backpropagation and a
//! mini-batch gradient-descent training loop. No autodiff, no GPU, no
//! adaptive optimizers.
//!
//! # Modules
//!
//! - `topology`: network structure (input width, layer specs, init schemes)
//! - `network`: parameters, initialization, forward/backward passes, trainer
//! - `dataset`: in-memory samples, CSV loading, scaling and splitting
//! - `config`: training hyperparameters and their JSON loader
//! - `utils`: RNG handle, activation functions, loss functions
//! - `error`: the crate-wide error taxonomy
//!
//! # Example
//!
//! ```
//! use gradnet::config::TrainingConfig;
//! use gradnet::dataset::Dataset;
//! use gradnet::network::{Model, Network};
//! use gradnet::topology::{LayerSpec, Topology};
//! use gradnet::utils::{Activation, SimpleRng};
//!
//! let topology = Topology::new(2, LayerSpec::new(1, Activation::Sigmoid))
//!     .add_hidden(LayerSpec::new(3, Activation::Tanh));
//!
//! let mut rng = SimpleRng::new(42);
//! let network = Network::new(topology, &mut rng).unwrap();
//! let mut model = Model::new(network, TrainingConfig {
//!     epochs: 20,
//!     learning_rate: 0.5,
//!     batch_size: 2,
//!     validation_split: None,
//! }).unwrap();
//!
//! let dataset = Dataset::new(
//!     vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
//!     vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
//! ).unwrap();
//!
//! model.fit(&dataset, &mut rng).unwrap();
//! let output = model.network.predict(&[1.0, 0.0]).unwrap();
//! assert_eq!(output.len(), 1);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod network;
pub mod topology;
pub mod utils;

pub use error::{NetworkError, Result};
pub use network::{Model, Network};
pub use topology::{InitKind, LayerSpec, Topology};
