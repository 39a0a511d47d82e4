//! # Cellmap
//!
//! Cellmap is a Rust library for combinatorial maps: graphs embedded in oriented
//! surfaces, encoded by a permutation of half-edges. It computes vertices,
//! faces and genus of such maps, extracts sub-maps, and samples uniformly random
//! maps with a single vertex and a single face of any given genus.
//!
//! ```
//! use cellmap::{uniform_reduced_map, OrientedMap};
//!
//! let map: OrientedMap = "(0,2,1,3)".parse().unwrap();
//! assert_eq!(map.genus().unwrap(), 1);
//!
//! let sampled = uniform_reduced_map(5).unwrap();
//! assert_eq!(sampled.genus().unwrap(), 5);
//! assert_eq!(sampled.num_edges(), 10);
//! ```

pub mod arith;
pub mod half_edge;
pub mod parser;
pub mod permutation;

pub use half_edge::{
    algorithms::{uniform_reduced_map, uniform_reduced_map_with_rng, SamplerSettings},
    colored::ColoredMap,
    involution::{EdgeIndex, Hedge},
    MapError, OrientedMap,
};
pub use permutation::Permutation;
