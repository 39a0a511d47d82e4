//! Turning an accepted split-and-join trace into a reduced map.
//!
//! The trace is undone from its end. The cycles under construction always
//! have the lengths of the chain's partition at that point, and every undone
//! move inserts the two half-edges of a fresh edge.

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use super::split_join::{ChainMove, Trace};
use crate::permutation::{Permutation, PermutationError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    #[error("Trace has odd length {len}")]
    OddLength { len: usize },
    #[error("Trace must end with (\"j\", 1, 1), found {found}")]
    MissingFinalJoin { found: ChainMove },
    #[error("Move {step} has a part of size zero")]
    EmptyPart { step: ChainMove },
    #[error("No cycle of length {len} left to undo {step}")]
    MissingCycle { step: ChainMove, len: usize },
    #[error("Reconstructed cycles are not a permutation: {0}")]
    Inconsistent(#[from] PermutationError),
}

/// Replays a trace backwards, one move at a time.
///
/// # Examples
///
/// ```
/// use cellmap::half_edge::algorithms::{
///     reconstruct::Reconstructor,
///     split_join::{ChainMove, Trace},
/// };
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let trace = Trace::from(vec![ChainMove::Split(2, 2), ChainMove::Join(1, 1)]);
/// let mut rebuild = Reconstructor::new(trace).unwrap();
/// assert_eq!(rebuild.cycles(), &[vec![0], vec![1]]);
///
/// let mut rng = SmallRng::seed_from_u64(0);
/// assert_eq!(rebuild.step(&mut rng).unwrap(), Some(ChainMove::Split(2, 2)));
/// let cycle = &rebuild.cycles()[0];
/// assert!(cycle == &[2, 0, 3, 1] || cycle == &[2, 1, 3, 0]);
/// assert_eq!(rebuild.step(&mut rng).unwrap(), None);
/// ```
#[derive(Clone, Debug)]
pub struct Reconstructor {
    remaining: Trace,
    cycles: Vec<Vec<usize>>,
    /// Edge whose half-edges the next undone move inserts.
    next_edge: usize,
}

impl Reconstructor {
    /// Checks the shape of `trace` and sets up the two one-element cycles of
    /// the final `Join(1, 1)`. The empty trace gives no cycles at all.
    pub fn new(mut trace: Trace) -> Result<Self, ReconstructError> {
        if trace.len() % 2 == 1 {
            return Err(ReconstructError::OddLength { len: trace.len() });
        }
        let Some(last) = trace.pop() else {
            return Ok(Reconstructor {
                remaining: trace,
                cycles: vec![],
                next_edge: 0,
            });
        };
        if last != ChainMove::Join(1, 1) {
            return Err(ReconstructError::MissingFinalJoin { found: last });
        }

        Ok(Reconstructor {
            remaining: trace,
            cycles: vec![vec![0], vec![1]],
            next_edge: 1,
        })
    }

    /// Cycles built so far, in insertion order.
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }

    /// Number of moves left to undo.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Undoes the latest move not yet undone and returns it, `None` once the
    /// whole trace is consumed.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<ChainMove>, ReconstructError> {
        let Some(step) = self.remaining.pop() else {
            return Ok(None);
        };
        let (a, b) = match step {
            ChainMove::Split(a, b) | ChainMove::Join(a, b) => (a, b),
        };
        if a == 0 || b == 0 {
            return Err(ReconstructError::EmptyPart { step });
        }

        let (source, sink) = (2 * self.next_edge, 2 * self.next_edge + 1);
        match step {
            ChainMove::Split(..) => {
                let first = self.take_cycle(a - 1, step, rng)?;
                let second = self.take_cycle(b - 1, step, rng)?;
                let first = rotate_randomly(first, rng);
                let second = rotate_randomly(second, rng);

                let mut cycle = Vec::with_capacity(a + b);
                cycle.push(source);
                cycle.extend(first);
                cycle.push(sink);
                cycle.extend(second);
                self.cycles.push(cycle);
            }
            ChainMove::Join(..) => {
                let joined = self.take_cycle(a + b - 2, step, rng)?;
                let mut joined = rotate_randomly(joined, rng);
                let tail = joined.split_off(a - 1);

                self.cycles.push(std::iter::once(source).chain(joined).collect());
                self.cycles.push(std::iter::once(sink).chain(tail).collect());
            }
        }

        self.next_edge += 1;
        Ok(Some(step))
    }

    /// Undoes every remaining move and returns the cycles of the vertex
    /// permutation.
    pub fn finish<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Vec<Vec<usize>>, ReconstructError> {
        while self.step(rng)?.is_some() {}
        Ok(self.cycles)
    }

    /// Removes a uniformly chosen cycle of length `len`.
    fn take_cycle<R: Rng + ?Sized>(
        &mut self,
        len: usize,
        step: ChainMove,
        rng: &mut R,
    ) -> Result<Vec<usize>, ReconstructError> {
        let candidates: Vec<usize> = self
            .cycles
            .iter()
            .enumerate()
            .filter(|(_, cycle)| cycle.len() == len)
            .map(|(i, _)| i)
            .collect();
        let &pos = candidates
            .choose(rng)
            .ok_or(ReconstructError::MissingCycle { step, len })?;
        Ok(self.cycles.remove(pos))
    }
}

/// `cycle` read from a uniformly chosen starting point.
fn rotate_randomly<R: Rng + ?Sized>(mut cycle: Vec<usize>, rng: &mut R) -> Vec<usize> {
    if !cycle.is_empty() {
        let start = rng.gen_range(0..cycle.len());
        cycle.rotate_left(start);
    }
    cycle
}

/// Vertex permutation of the map described by an accepted trace of length
/// `2g`: a single vertex with `2g` edges and a single face.
pub fn vertex_permutation_from_trace<R: Rng + ?Sized>(
    trace: Trace,
    rng: &mut R,
) -> Result<Permutation, ReconstructError> {
    let cycles = Reconstructor::new(trace)?.finish(rng)?;
    Ok(Permutation::from_disjoint_cycles(&cycles)?)
}
