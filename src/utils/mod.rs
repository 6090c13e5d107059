//! Shared utilities for the network engine
//!
//! This module provides random number generation, activation functions and
//! loss functions used across the forward, backward and training code.

pub mod activations;
pub mod losses;
pub mod rng;

pub use activations::{softmax, Activation};
pub use losses::{categorical_cross_entropy, mean_squared_error};
pub use rng::SimpleRng;
