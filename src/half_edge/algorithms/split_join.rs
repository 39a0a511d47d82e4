//! The split-and-join Markov chain on integer partitions.
//!
//! Starting from the one-part partition `[4g]`, each step picks an ordered
//! pair of distinct positions among the `n` units laid out part after part.
//! Two positions in the same part split it (consuming two units), positions
//! in different parts join them (also consuming two units). After `2g - 1`
//! steps a successful run ends at `[1, 1]`.
//!
//! Splitting off a part of size one, or joining two parts of size one, kills
//! the run. Rejected runs are thrown away as a whole, which is what makes the
//! accepted traces correctly distributed.

use std::fmt::{self, Display};

use rand::Rng;

use super::SampleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub enum ChainMove {
    /// A part of size `a + b` cut into `a - 1` and `b - 1`.
    Split(usize, usize),
    /// Parts of size `a` and `b` merged into `a + b - 2`.
    Join(usize, usize),
}

impl Display for ChainMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainMove::Split(a, b) => write!(f, "(\"s\", {a}, {b})"),
            ChainMove::Join(a, b) => write!(f, "(\"j\", {a}, {b})"),
        }
    }
}

/// Moves of one run of the chain, in the order they were made.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    moves: Vec<ChainMove>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: ChainMove) {
        self.moves.push(step);
    }

    /// Removes the most recent move.
    pub fn pop(&mut self) -> Option<ChainMove> {
        self.moves.pop()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[ChainMove] {
        &self.moves
    }

    /// Replays the trace from `[2 * len]` and returns the partition before
    /// the first move and after every move, each sorted decreasingly.
    ///
    /// `None` if a move does not apply to the partition it meets. Parts of
    /// size zero are dropped, so a complete trace ends with the empty partition.
    pub fn partitions(&self) -> Option<Vec<Vec<usize>>> {
        let mut partition = vec![2 * self.len()];
        let mut partitions = vec![partition.clone()];

        for step in &self.moves {
            match *step {
                ChainMove::Split(a, b) => {
                    take_part(&mut partition, a + b)?;
                    partition.extend([a.checked_sub(1)?, b.checked_sub(1)?]);
                }
                ChainMove::Join(a, b) => {
                    take_part(&mut partition, a)?;
                    take_part(&mut partition, b)?;
                    partition.push((a + b).checked_sub(2)?);
                }
            }
            partition.retain(|&part| part > 0);
            partition.sort_unstable_by(|x, y| y.cmp(x));
            partitions.push(partition.clone());
        }

        Some(partitions)
    }
}

fn take_part(partition: &mut Vec<usize>, size: usize) -> Option<()> {
    let pos = partition.iter().position(|&part| part == size)?;
    partition.remove(pos);
    Some(())
}

impl Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.moves.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{step}")?;
        }
        write!(f, "]")
    }
}

impl From<Vec<ChainMove>> for Trace {
    fn from(moves: Vec<ChainMove>) -> Self {
        Trace { moves }
    }
}

/// Outcome of a single run of the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attempt {
    /// Complete trace of length `2g`, ending with `Join(1, 1)`.
    Accepted(Trace),
    /// Trace up to and including the forbidden move.
    Rejected(Trace),
}

impl Attempt {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Attempt::Accepted(_))
    }

    pub fn trace(&self) -> &Trace {
        match self {
            Attempt::Accepted(trace) | Attempt::Rejected(trace) => trace,
        }
    }
}

/// Indices of the parts containing unit positions `i` and `j`.
fn locate(partition: &[usize], i: usize, j: usize) -> (usize, usize) {
    let mut owner_i = 0;
    let mut owner_j = 0;
    let mut offset = 0;
    for (k, &part) in partition.iter().enumerate() {
        if (offset..offset + part).contains(&i) {
            owner_i = k;
        }
        if (offset..offset + part).contains(&j) {
            owner_j = k;
        }
        offset += part;
    }
    (owner_i, owner_j)
}

/// Runs the chain once for genus `genus`.
///
/// For genus zero there is nothing to do and the empty trace is accepted.
pub fn split_and_join_attempt<R: Rng + ?Sized>(genus: usize, rng: &mut R) -> Attempt {
    let mut trace = Trace::new();
    if genus == 0 {
        return Attempt::Accepted(trace);
    }

    let mut partition = vec![4 * genus];
    for n in (4..=4 * genus).rev().step_by(2) {
        debug_assert_eq!(partition.iter().sum::<usize>(), n);

        // ordered pair of distinct positions, sorted
        let mut i = rng.gen_range(0..n);
        let mut j = rng.gen_range(0..n - 1);
        if j >= i {
            j += 1;
        } else {
            std::mem::swap(&mut i, &mut j);
        }

        let (pi, pj) = locate(&partition, i, j);
        if pi == pj {
            let part = partition[pi];
            let s = rng.gen_range(1..part);
            trace.push(ChainMove::Split(s, part - s));
            if s == 1 || part - s == 1 {
                return Attempt::Rejected(trace);
            }
            partition[pi] = s - 1;
            partition.push(part - s - 1);
        } else {
            let (a, b) = (partition[pi], partition[pj]);
            trace.push(ChainMove::Join(a, b));
            if a == 1 && b == 1 {
                return Attempt::Rejected(trace);
            }
            // pi < pj, removing pj leaves pi in place
            partition.remove(pj);
            partition[pi] = a + b - 2;
        }
    }

    debug_assert_eq!(partition, [1, 1]);
    trace.push(ChainMove::Join(1, 1));
    Attempt::Accepted(trace)
}

/// Runs the chain until a run is accepted. Returns the number of runs made
/// together with the accepted trace.
///
/// The expected number of runs grows with the genus and there is no cap, see
/// [`split_and_join_bounded`] for one.
pub fn split_and_join<R: Rng + ?Sized>(genus: usize, rng: &mut R) -> (usize, Trace) {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match split_and_join_attempt(genus, rng) {
            Attempt::Accepted(trace) => {
                tracing::debug!(genus, attempts, "accepted split-and-join trace");
                return (attempts, trace);
            }
            Attempt::Rejected(trace) => {
                tracing::trace!(genus, attempts, moves = trace.len(), "rejected run");
            }
        }
    }
}

/// Like [`split_and_join`], giving up after `max_attempts` rejected runs.
pub fn split_and_join_bounded<R: Rng + ?Sized>(
    genus: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<(usize, Trace), SampleError> {
    for attempts in 1..=max_attempts {
        match split_and_join_attempt(genus, rng) {
            Attempt::Accepted(trace) => {
                tracing::debug!(genus, attempts, "accepted split-and-join trace");
                return Ok((attempts, trace));
            }
            Attempt::Rejected(trace) => {
                tracing::trace!(genus, attempts, moves = trace.len(), "rejected run");
            }
        }
    }
    tracing::warn!(genus, max_attempts, "no accepted split-and-join trace");
    Err(SampleError::AttemptsExhausted {
        genus,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    #[test]
    fn locate_parts() {
        let partition = [3, 1, 2];
        assert_eq!(locate(&partition, 0, 2), (0, 0));
        assert_eq!(locate(&partition, 2, 3), (0, 1));
        assert_eq!(locate(&partition, 3, 5), (1, 2));
        assert_eq!(locate(&partition, 4, 5), (2, 2));
    }

    #[test]
    fn genus_zero_is_trivial() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            split_and_join_attempt(0, &mut rng),
            Attempt::Accepted(Trace::new())
        );
    }

    #[test]
    fn genus_one_has_a_single_trace() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..20 {
            let (attempts, trace) = split_and_join(1, &mut rng);
            assert!(attempts >= 1);
            assert_eq!(
                trace.moves(),
                &[ChainMove::Split(2, 2), ChainMove::Join(1, 1)]
            );
        }
    }

    #[test]
    fn accepted_traces_are_complete() {
        let mut rng = SmallRng::seed_from_u64(42);
        for genus in 1..=6 {
            let (_, trace) = split_and_join(genus, &mut rng);
            assert_eq!(trace.len(), 2 * genus);
            assert_eq!(trace.moves().last(), Some(&ChainMove::Join(1, 1)));

            let partitions = trace.partitions().unwrap();
            assert_eq!(partitions[0], vec![4 * genus]);
            assert_eq!(partitions[2 * genus - 1], vec![1, 1]);
            assert!(partitions[2 * genus].is_empty());
            for (k, partition) in partitions.iter().enumerate() {
                assert_eq!(partition.iter().sum::<usize>(), 4 * genus - 2 * k);
            }
        }
    }

    #[test]
    fn rejected_traces_end_with_a_forbidden_move() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut rejected = 0;
        for _ in 0..200 {
            if let Attempt::Rejected(trace) = split_and_join_attempt(3, &mut rng) {
                rejected += 1;
                let forbidden = match trace.moves().last() {
                    Some(ChainMove::Split(a, b)) => *a == 1 || *b == 1,
                    Some(ChainMove::Join(a, b)) => *a == 1 && *b == 1,
                    None => false,
                };
                assert!(forbidden, "{trace}");
                assert!(trace.len() < 6);
            }
        }
        assert!(rejected > 0);
    }

    #[test]
    fn bounded_gives_up() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(
            split_and_join_bounded(4, 0, &mut rng),
            Err(SampleError::AttemptsExhausted {
                genus: 4,
                attempts: 0
            })
        );
        let (attempts, trace) = split_and_join_bounded(2, 10_000, &mut rng).unwrap();
        assert!(attempts <= 10_000);
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn display() {
        let trace = Trace::from(vec![ChainMove::Split(2, 2), ChainMove::Join(1, 1)]);
        insta::assert_snapshot!(trace.to_string(), @r#"[("s", 2, 2), ("j", 1, 1)]"#);
    }

    #[test]
    fn partitions_reject_inapplicable_moves() {
        let trace = Trace::from(vec![ChainMove::Join(3, 1), ChainMove::Join(1, 1)]);
        assert_eq!(trace.partitions(), None);
    }
}
