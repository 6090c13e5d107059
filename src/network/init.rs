//! Parameter initialization
//!
//! Fills a [`ParameterSet`] from a [`Topology`] using per-layer
//! variance-scaling schemes. Each layer's fill touches disjoint memory and
//! reads only the immutable topology, so layers are initialized in a rayon
//! fork/join; the join completes before the parameters are handed to the
//! caller, and the result is deterministic for a given master RNG state
//! because every layer gets its own seed split off up front.

use crate::network::params::{LayerParams, ParameterSet};
use crate::topology::{InitKind, Topology};
use crate::utils::SimpleRng;
use log::debug;
use rayon::prelude::*;

use crate::error::Result;

/// Build a fully initialized parameter set for `topology`.
///
/// Weights follow each layer's [`InitKind`]; biases are always zero.
pub fn initialize(topology: &Topology, rng: &mut SimpleRng) -> Result<ParameterSet> {
    topology.validate()?;

    let layer_count = topology.trainable_layer_count();
    let seeds: Vec<u64> = (0..layer_count).map(|_| rng.split_seed()).collect();

    let layers: Vec<LayerParams> = seeds
        .into_par_iter()
        .enumerate()
        .map(|(l, seed)| {
            let spec = topology.layer_spec(l);
            init_layer(topology.fan_in(l), spec.neurons, spec.init, seed)
        })
        .collect();

    let params = ParameterSet { layers };
    debug!(
        "initialized {} layers, {} parameters",
        layer_count,
        params.parameter_count()
    );
    Ok(params)
}

/// Fill one layer's weight matrix and zero its biases.
fn init_layer(fan_in: usize, neurons: usize, kind: InitKind, seed: u64) -> LayerParams {
    let mut rng = SimpleRng::new(seed);
    let weights = (0..neurons)
        .map(|_| {
            (0..fan_in)
                .map(|_| sample_weight(kind, fan_in, neurons, &mut rng))
                .collect()
        })
        .collect();
    LayerParams {
        weights,
        biases: vec![0.0; neurons],
    }
}

fn sample_weight(kind: InitKind, fan_in: usize, fan_out: usize, rng: &mut SimpleRng) -> f64 {
    match kind {
        InitKind::KaimingNormal => rng.next_gaussian() * (2.0 / fan_in as f64).sqrt(),
        InitKind::KaimingUniform => {
            let limit = (6.0 / fan_in as f64).sqrt();
            rng.gen_range_f64(-limit, limit)
        }
        InitKind::XavierNormal => {
            rng.next_gaussian() * (2.0 / (fan_in + fan_out) as f64).sqrt()
        }
        InitKind::XavierUniform => {
            let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
            rng.gen_range_f64(-limit, limit)
        }
    }
}
