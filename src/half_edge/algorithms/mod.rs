//! # Sampling reduced maps
//!
//! A reduced map of genus `g` has one vertex, one face and `2g` edges. They
//! are sampled uniformly in two stages:
//!
//! - [`split_join`]: a rejection-sampled Markov chain on integer partitions
//!   produces a trace of `2g` moves,
//! - [`reconstruct`]: the trace is undone backwards, inserting one edge per
//!   move, which yields the vertex permutation.
//!
//! ```
//! use cellmap::half_edge::algorithms::{uniform_reduced_map_with_settings, SamplerSettings};
//!
//! let settings = SamplerSettings {
//!     seed: Some(17),
//!     ..Default::default()
//! };
//! let sampled = uniform_reduced_map_with_settings(3, &settings).unwrap();
//! assert_eq!(sampled.map.genus().unwrap(), 3);
//! assert!(sampled.map.is_reduced());
//! assert!(sampled.attempts >= 1);
//! ```

use rand::{rngs::SmallRng, Rng, SeedableRng};
use thiserror::Error;

use super::{MapError, OrientedMap};

pub mod reconstruct;
pub mod split_join;

use reconstruct::{vertex_permutation_from_trace, ReconstructError};
use split_join::{split_and_join, split_and_join_bounded, Trace};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerSettings {
    /// Seed of the `SmallRng` driving the sampler, fresh entropy when absent.
    pub seed: Option<u64>,
    /// Cap on the number of chain runs, unbounded when absent.
    pub max_attempts: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct SampledMap {
    pub map: OrientedMap,
    /// Chain runs needed, the accepted one included.
    pub attempts: usize,
    pub trace: Trace,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("No accepted trace for genus {genus} after {attempts} attempts")]
    AttemptsExhausted { genus: usize, attempts: usize },
    #[error("Reconstruction failed: {0}")]
    Reconstruct(#[from] ReconstructError),
    #[error("Sampled permutation is not a map: {0}")]
    Map(#[from] MapError),
}

/// A uniformly random reduced map of genus `genus`, using the thread-local
/// generator.
pub fn uniform_reduced_map(genus: usize) -> Result<OrientedMap, SampleError> {
    uniform_reduced_map_with_rng(genus, &mut rand::thread_rng())
}

pub fn uniform_reduced_map_with_rng<R: Rng + ?Sized>(
    genus: usize,
    rng: &mut R,
) -> Result<OrientedMap, SampleError> {
    Ok(sample_reduced_map(genus, None, rng)?.map)
}

/// Samples with a generator and attempt cap taken from `settings`.
pub fn uniform_reduced_map_with_settings(
    genus: usize,
    settings: &SamplerSettings,
) -> Result<SampledMap, SampleError> {
    let mut rng = match settings.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    sample_reduced_map(genus, settings.max_attempts, &mut rng)
}

/// Runs the chain (at most `max_attempts` times if given) and rebuilds the
/// map from the accepted trace.
pub fn sample_reduced_map<R: Rng + ?Sized>(
    genus: usize,
    max_attempts: Option<usize>,
    rng: &mut R,
) -> Result<SampledMap, SampleError> {
    if genus == 0 {
        return Ok(SampledMap {
            map: OrientedMap::empty(),
            attempts: 0,
            trace: Trace::new(),
        });
    }

    let (attempts, trace) = match max_attempts {
        Some(max_attempts) => split_and_join_bounded(genus, max_attempts, rng)?,
        None => split_and_join(genus, rng),
    };
    let vp = vertex_permutation_from_trace(trace.clone(), rng)?;
    let map = OrientedMap::from_permutation(vp)?;
    tracing::debug!(genus, attempts, edges = map.num_edges(), "sampled reduced map");

    Ok(SampledMap {
        map,
        attempts,
        trace,
    })
}
