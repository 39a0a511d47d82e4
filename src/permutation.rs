//! # Permutations
//!
//! This module provides the `Permutation` struct used for the vertex and face
//! permutations of a map: bijections of `0..n` stored by their direct mapping
//! (`map[i]` is the image of `i`) and their inverse mapping.
//!
//! ## Key Features:
//!
//! - **Construction**:
//!   - Identity permutation: `Permutation::id(n)`.
//!   - From a trusted mapping vector: `Permutation::from_map(vec![...])`.
//!   - From an untrusted mapping vector: `Permutation::try_from_map(vec![...])`.
//!   - From disjoint cycles: `Permutation::from_disjoint_cycles(&[vec![...]])`.
//!   - From cycle notation: `Permutation::from_cycle_notation("(0,1)(2,3)")`.
//! - **Basic Operations**:
//!   - Inverse: `p.inverse()`.
//!   - Composition: `p1.compose(&p2)` (applies `p2` then `p1`).
//!   - Exchanging two images in place: `p.swap_images(a, b)`.
//! - **Cycle Utilities**:
//!   - Cycle decomposition: `p.cycle_decomposition()`, each cycle starting at its
//!     minimum.
//!   - Single orbit: `p.orbit(i)`.
//!   - Order: `p.order()`, the lcm of the cycle lengths, `None` when it
//!     overflows `usize`.

use std::{fmt, ops::Index};

use bitvec::vec::BitVec;
use thiserror::Error;

use crate::{
    arith::checked_lcm_list,
    parser::{format_cycles, parse_cycles, CycleParseError},
};

/// A permutation of `0..n`.
///
/// # Examples
///
/// ```
/// use cellmap::permutation::Permutation;
///
/// // 0->2, 1->0, 2->1, 3->3
/// let p = Permutation::from_map(vec![2, 0, 1, 3]);
/// assert_eq!(p[0], 2);
/// assert_eq!(p.cycle_decomposition(), vec![vec![0, 2, 1], vec![3]]);
/// assert_eq!(p.order(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Permutation {
    map: Vec<usize>,
    inv: Vec<usize>,
}

/// Implement ordering comparisons for permutations based on their `map` field.
impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.map.partial_cmp(&other.map)
    }
}

impl Permutation {
    /// Largest domain built from listed elements, see
    /// [`Permutation::from_disjoint_cycles`].
    pub const MAX_LEN: usize = u32::MAX as usize;

    // --------------------------------------------------------------------------------------------
    // Basic Constructors and Accessors
    // --------------------------------------------------------------------------------------------

    /// Creates the identity permutation of length `n`.
    pub fn id(n: usize) -> Self {
        Permutation {
            map: (0..n).collect(),
            inv: (0..n).collect(),
        }
    }

    /// Creates a permutation from a mapping vector.
    /// The `map` vector states where index `i` is sent: `map[i]` is the image of `i`.
    ///
    /// The vector is trusted to be a bijection of `0..map.len()`, use
    /// [`Permutation::try_from_map`] for unchecked data.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cellmap::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]);
    /// assert_eq!(p.inv(), &[1, 2, 0]);
    /// ```
    pub fn from_map(map: Vec<usize>) -> Self {
        let mut inv = vec![0; map.len()];
        for (i, &j) in map.iter().enumerate() {
            inv[j] = i;
        }
        Permutation { map, inv }
    }

    /// Creates a permutation from a mapping vector, checking that it is a
    /// bijection of `0..map.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cellmap::permutation::{Permutation, PermutationError};
    /// assert!(Permutation::try_from_map(vec![1, 2, 0]).is_ok());
    /// assert_eq!(
    ///     Permutation::try_from_map(vec![1, 1, 0]),
    ///     Err(PermutationError::RepeatedImage { image: 1 })
    /// );
    /// ```
    pub fn try_from_map(map: Vec<usize>) -> Result<Self, PermutationError> {
        let len = map.len();
        let mut inv = vec![usize::MAX; len];
        for (i, &j) in map.iter().enumerate() {
            if j >= len {
                return Err(PermutationError::ImageOutOfRange { image: j, len });
            }
            if inv[j] != usize::MAX {
                return Err(PermutationError::RepeatedImage { image: j });
            }
            inv[j] = i;
        }
        Ok(Permutation { map, inv })
    }

    /// Creates a permutation from a set of disjoint cycles.
    /// The permutation acts on `0..=max`, where `max` is the largest listed
    /// element; elements missing from every cycle are fixed. Elements must be
    /// below [`Permutation::MAX_LEN`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use cellmap::permutation::Permutation;
    /// let cycles = vec![vec![0, 1, 2], vec![3, 4]];
    /// let p = Permutation::from_disjoint_cycles(&cycles).unwrap();
    /// assert_eq!(p.map(), &[1, 2, 0, 4, 3]);
    ///
    /// // Error if cycles are not disjoint
    /// let invalid = vec![vec![0, 1], vec![1, 2]];
    /// assert!(Permutation::from_disjoint_cycles(&invalid).is_err());
    /// ```
    pub fn from_disjoint_cycles<C: AsRef<[usize]>>(cycles: &[C]) -> Result<Self, PermutationError> {
        let n = cycles
            .iter()
            .flat_map(|cycle| cycle.as_ref().iter())
            .max()
            .copied();
        let n = match n {
            Some(max) if max >= Self::MAX_LEN => {
                return Err(PermutationError::ElementTooLarge { element: max })
            }
            Some(max) => max + 1,
            None => 0,
        };

        let mut seen: BitVec = BitVec::repeat(false, n);
        let mut map = (0..n).collect::<Vec<_>>();
        for cycle in cycles {
            let cycle = cycle.as_ref();
            for (i, &from) in cycle.iter().enumerate() {
                if seen.replace(from, true) {
                    return Err(PermutationError::OverlappingCycles { element: from });
                }
                map[from] = cycle[(i + 1) % cycle.len()];
            }
        }

        Ok(Permutation::from_map(map))
    }

    /// Parses cycle notation, see [`crate::parser`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use cellmap::permutation::Permutation;
    /// let p = Permutation::from_cycle_notation("(1,2)(3,4)(6,7,8)").unwrap();
    /// assert_eq!(p.len(), 9);
    /// assert_eq!(p.order(), Some(6));
    /// ```
    pub fn from_cycle_notation(text: &str) -> Result<Self, PermutationError> {
        let cycles = parse_cycles(text)?
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .map(PermutationError::element_from_label)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_disjoint_cycles(&cycles)
    }

    /// Returns the internal mapping as a slice.
    pub fn map(&self) -> &[usize] {
        &self.map
    }

    /// Returns the inverse mapping as a slice.
    pub fn inv(&self) -> &[usize] {
        &self.inv
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // --------------------------------------------------------------------------------------------
    // Basic Operations
    // --------------------------------------------------------------------------------------------

    /// Returns the inverse of the permutation.
    pub fn inverse(&self) -> Self {
        Permutation {
            map: self.inv.clone(),
            inv: self.map.clone(),
        }
    }

    /// Composes `self` with another permutation `other`, returning a new permutation:
    /// `(self ◦ other)(i) = self.map[other.map[i]]`.
    pub fn compose(&self, other: &Self) -> Self {
        let map = other.map.iter().map(|&i| self.map[i]).collect();
        Self::from_map(map)
    }

    /// Exchanges the images of `a` and `b`.
    ///
    /// If `a` and `b` lie in the same cycle, that cycle splits in two; otherwise
    /// their two cycles merge.
    ///
    /// ```
    /// # use cellmap::permutation::Permutation;
    /// let mut p = Permutation::from_map(vec![1, 2, 3, 0]);
    /// p.swap_images(0, 2);
    /// assert_eq!(p.cycle_decomposition(), vec![vec![0, 3], vec![1, 2]]);
    /// ```
    pub fn swap_images(&mut self, a: usize, b: usize) {
        self.map.swap(a, b);
        self.inv[self.map[a]] = a;
        self.inv[self.map[b]] = b;
    }

    /// Checks if this permutation is the identity permutation.
    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &m)| i == m)
    }

    // --------------------------------------------------------------------------------------------
    // Cycles
    // --------------------------------------------------------------------------------------------

    /// Returns the cycle decomposition of `self`, fixed points included.
    ///
    /// Each cycle starts at its smallest element and cycles are listed by
    /// increasing smallest element, e.g. `[0, 2, 1]` means `0->2, 2->1, 1->0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cellmap::permutation::Permutation;
    /// let p = Permutation::from_map(vec![3, 0, 1, 2, 4]);
    /// assert_eq!(p.cycle_decomposition(), vec![vec![0, 3, 2, 1], vec![4]]);
    /// ```
    pub fn cycle_decomposition(&self) -> Vec<Vec<usize>> {
        let mut visited: BitVec = BitVec::repeat(false, self.map.len());
        let mut cycles = Vec::new();
        for i in 0..self.map.len() {
            if visited[i] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut j = i;
            while !visited.replace(j, true) {
                cycle.push(j);
                j = self.map[j];
            }
            cycles.push(cycle);
        }
        cycles
    }

    /// Returns the cycle through `i`, starting at `i`.
    ///
    /// ```
    /// # use cellmap::permutation::Permutation;
    /// let p = Permutation::from_map(vec![3, 0, 1, 2]);
    /// assert_eq!(p.orbit(2), vec![2, 1, 0, 3]);
    /// ```
    pub fn orbit(&self, i: usize) -> Vec<usize> {
        let mut orbit = vec![i];
        let mut j = self.map[i];
        while j != i {
            orbit.push(j);
            j = self.map[j];
        }
        orbit
    }

    /// Number of cycles, fixed points included.
    pub fn num_cycles(&self) -> usize {
        self.cycle_decomposition().len()
    }

    /// The order of the permutation in the symmetric group: the least common
    /// multiple of its cycle lengths. Identity and empty permutation have order 1.
    ///
    /// `None` if the order does not fit in a `usize`, which already happens
    /// for a few hundred elements.
    pub fn order(&self) -> Option<usize> {
        checked_lcm_list(self.cycle_decomposition().iter().map(Vec::len))
    }
}

/// Prints the non-trivial cycles in cycle notation, `()` for the identity.
impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles: Vec<Vec<usize>> = self
            .cycle_decomposition()
            .into_iter()
            .filter(|cycle| cycle.len() > 1)
            .collect();
        if cycles.is_empty() {
            write!(f, "()")
        } else {
            write!(f, "{}", format_cycles(&cycles, false))
        }
    }
}

impl Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.map[index]
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Image {image} out of range for a permutation of length {len}")]
    ImageOutOfRange { image: usize, len: usize },
    #[error("Image {image} is hit twice")]
    RepeatedImage { image: usize },
    #[error("Element {element} appears in more than one cycle")]
    OverlappingCycles { element: usize },
    #[error("Negative label {label} in a permutation")]
    NegativeLabel { label: i64 },
    #[error("Label {label} does not name a representable element")]
    LabelTooLarge { label: i64 },
    #[error("Element {element} is beyond the largest supported domain")]
    ElementTooLarge { element: usize },
    #[error("ParseError: {0}")]
    Parse(#[from] CycleParseError),
}

impl PermutationError {
    /// Element named by a parsed plain label.
    pub(crate) fn element_from_label(label: i64) -> Result<usize, PermutationError> {
        if label < 0 {
            return Err(PermutationError::NegativeLabel { label });
        }
        usize::try_from(label).map_err(|_| PermutationError::LabelTooLarge { label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_disjoint_cycles() {
        let cycles = vec![vec![0, 3, 2], vec![1, 4]];
        let p = Permutation::from_disjoint_cycles(&cycles).unwrap();
        assert_eq!(p.map(), &[3, 4, 0, 2, 1]);

        let cycles = vec![vec![0, 1, 2]];
        let p = Permutation::from_disjoint_cycles(&cycles).unwrap();
        assert_eq!(p.map(), &[1, 2, 0]);

        let cycles = vec![vec![0, 1], vec![1, 2]];
        assert_eq!(
            Permutation::from_disjoint_cycles(&cycles),
            Err(PermutationError::OverlappingCycles { element: 1 })
        );

        let cycles: Vec<Vec<usize>> = vec![];
        let p = Permutation::from_disjoint_cycles(&cycles).unwrap();
        assert!(p.map().is_empty());

        let cycles = vec![vec![0]];
        let p = Permutation::from_disjoint_cycles(&cycles).unwrap();
        assert_eq!(p.map(), &[0]);

        // elements not listed stay fixed
        let cycles = vec![vec![3, 1]];
        let p = Permutation::from_disjoint_cycles(&cycles).unwrap();
        assert_eq!(p.map(), &[0, 3, 2, 1]);

        let cycles = vec![vec![0, usize::MAX]];
        assert_eq!(
            Permutation::from_disjoint_cycles(&cycles),
            Err(PermutationError::ElementTooLarge { element: usize::MAX })
        );
        let cycles = vec![vec![Permutation::MAX_LEN]];
        assert_eq!(
            Permutation::from_disjoint_cycles(&cycles),
            Err(PermutationError::ElementTooLarge {
                element: Permutation::MAX_LEN
            })
        );
    }

    #[test]
    fn test_try_from_map() {
        assert_eq!(
            Permutation::try_from_map(vec![0, 3, 1]),
            Err(PermutationError::ImageOutOfRange { image: 3, len: 3 })
        );
        assert_eq!(
            Permutation::try_from_map(vec![2, 0, 2]),
            Err(PermutationError::RepeatedImage { image: 2 })
        );
        assert_eq!(
            Permutation::try_from_map(vec![2, 0, 1]).unwrap(),
            Permutation::from_map(vec![2, 0, 1])
        );
        assert!(Permutation::try_from_map(vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_from_cycle_notation() {
        let p = Permutation::from_cycle_notation("(0,1)(3,2)").unwrap();
        assert_eq!(p.map(), &[1, 0, 3, 2]);

        let p = Permutation::from_cycle_notation("()").unwrap();
        assert!(p.is_empty());

        assert_eq!(
            Permutation::from_cycle_notation("(0,~1)"),
            Err(PermutationError::NegativeLabel { label: -2 })
        );
        assert!(matches!(
            Permutation::from_cycle_notation("(0,1"),
            Err(PermutationError::Parse(_))
        ));
    }

    #[test]
    fn test_order() {
        for (notation, order) in [
            ("()", 1),
            ("(1)", 1),
            ("(1,2)", 2),
            ("(1,2)(3,4)(6,7,8)", 6),
            ("(0,1,2,3)(4,5,6,7,8,9)", 12),
        ] {
            let p = Permutation::from_cycle_notation(notation).unwrap();
            assert_eq!(p.order(), Some(order), "{notation}");
        }
        assert_eq!(Permutation::id(0).order(), Some(1));
        assert_eq!(Permutation::id(7).order(), Some(1));
    }

    #[test]
    fn test_order_overflow() {
        // one cycle for each prime up to 53, 381 elements in total
        let primes = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];
        let mut start = 0;
        let mut cycles = vec![];
        for len in primes {
            cycles.push((start..start + len).collect::<Vec<usize>>());
            start += len;
        }
        let p = Permutation::from_disjoint_cycles(&cycles).unwrap();
        assert_eq!(p.len(), 381);
        if usize::BITS == 64 {
            assert_eq!(p.order(), None);
        }

        let p = Permutation::from_disjoint_cycles(&cycles[..9]).unwrap();
        assert_eq!(p.order(), Some(223_092_870));
    }

    #[test]
    fn test_cycle_decomposition() {
        let p = Permutation::from_map(vec![2, 0, 1, 3]);
        assert_eq!(p.cycle_decomposition(), vec![vec![0, 2, 1], vec![3]]);
        assert_eq!(p.num_cycles(), 2);

        let p = Permutation::from_cycle_notation("(5,3)(4,1,2)").unwrap();
        assert_eq!(
            p.cycle_decomposition(),
            vec![vec![0], vec![1, 2, 4], vec![3, 5]]
        );
    }

    #[test]
    fn test_orbit() {
        let p = Permutation::from_cycle_notation("(5,3)(4,1,2)").unwrap();
        assert_eq!(p.orbit(4), vec![4, 1, 2]);
        assert_eq!(p.orbit(0), vec![0]);
        assert_eq!(p.orbit(3), vec![3, 5]);
    }

    #[test]
    fn test_swap_images() {
        let mut p = Permutation::from_cycle_notation("(0,1)(2,3)").unwrap();
        p.swap_images(0, 2);
        assert_eq!(p.cycle_decomposition(), vec![vec![0, 3, 2, 1]]);
        assert_eq!(p.compose(&p.inverse()), Permutation::id(4));
        p.swap_images(0, 2);
        assert_eq!(p, Permutation::from_cycle_notation("(0,1)(2,3)").unwrap());
    }

    #[test]
    fn test_is_identity() {
        let p = Permutation::id(5);
        assert!(p.is_identity());

        let q = Permutation::from_map(vec![1, 0, 2]);
        assert!(!q.is_identity());
    }

    #[test]
    fn test_compose() {
        let p1 = Permutation::from_map(vec![1, 2, 0]);
        let p2 = Permutation::from_map(vec![2, 0, 1]);
        assert_eq!(p1.compose(&p2), Permutation::id(3));
        assert_eq!(p2.compose(&p1), Permutation::id(3));
        assert_eq!(p1.inverse(), p2);

        let p1 = Permutation::from_map(vec![1, 0, 2]); // (0 1)
        let p2 = Permutation::from_map(vec![0, 2, 1]); // (1 2)
        assert_eq!(p1.compose(&p2).map(), &[1, 2, 0]);
        assert_eq!(p2.compose(&p1).map(), &[2, 0, 1]);
    }

    #[test]
    fn test_display() {
        let p = Permutation::from_cycle_notation("(5,3)(4,1,2)").unwrap();
        assert_eq!(p.to_string(), "(1,2,4)(3,5)");
        assert_eq!(Permutation::id(3).to_string(), "()");
    }

    mod property_based_tests {
        use super::*;
        use crate::arith::lcm_list;
        use proptest::prelude::*;

        fn permutation() -> impl Strategy<Value = Permutation> {
            (0usize..40)
                .prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
                .prop_map(Permutation::from_map)
        }

        proptest! {
            #[test]
            fn cycles_partition_domain(p in permutation()) {
                let mut seen = vec![0usize; p.len()];
                for cycle in p.cycle_decomposition() {
                    prop_assert_eq!(cycle[0], *cycle.iter().min().unwrap());
                    for (i, &h) in cycle.iter().enumerate() {
                        seen[h] += 1;
                        prop_assert_eq!(p[h], cycle[(i + 1) % cycle.len()]);
                    }
                }
                prop_assert!(seen.iter().all(|&count| count == 1));
            }

            #[test]
            fn order_is_lcm_of_cycle_lengths(p in permutation()) {
                let order = p.order().unwrap();
                prop_assert_eq!(
                    order,
                    lcm_list(p.cycle_decomposition().iter().map(Vec::len))
                );
                let mut power = Permutation::id(p.len());
                for _ in 0..order {
                    power = power.compose(&p);
                }
                prop_assert!(power.is_identity());
            }

            #[test]
            fn display_round_trip(p in permutation()) {
                let q = Permutation::from_cycle_notation(&p.to_string()).unwrap();
                // trailing fixed points are not printed
                prop_assert_eq!(&q.map()[..], &p.map()[..q.len()]);
                prop_assert!(p.map()[q.len()..].iter().enumerate().all(|(i, &x)| x == i + q.len()));
            }
        }
    }
}
