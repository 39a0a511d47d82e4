//! Half-edges, edges and the fixed edge involution.
//!
//! Edge `e` owns the two half-edges `2e` and `2e + 1`. The involution σ
//! exchanging them is implicit in the labelling and never stored.

use std::fmt::Display;

use derive_more::{From, Into};

use crate::{parser::Label, permutation::Permutation};

/// A half-edge (dart) label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Hedge(pub usize);

impl Hedge {
    /// The other half of the same edge, σ(h).
    pub fn inv(self) -> Hedge {
        Hedge(self.0 ^ 1)
    }

    pub fn edge(self) -> EdgeIndex {
        EdgeIndex(self.0 / 2)
    }

    /// Whether this is the even half `2e` of its edge.
    pub fn is_source(self) -> bool {
        self.0 % 2 == 0
    }
}

impl Display for Hedge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Label for Hedge {
    fn label(self) -> i64 {
        self.0 as i64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct EdgeIndex(pub usize);

impl EdgeIndex {
    pub fn source(self) -> Hedge {
        Hedge(2 * self.0)
    }

    pub fn sink(self) -> Hedge {
        Hedge(2 * self.0 + 1)
    }

    pub fn hedges(self) -> [Hedge; 2] {
        [self.source(), self.sink()]
    }
}

impl Display for EdgeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// σ on `0..n_hedges` as an explicit permutation, `n_hedges` even.
pub fn edge_involution(n_hedges: usize) -> Permutation {
    Permutation::from_map((0..n_hedges).map(|h| h ^ 1).collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn halves() {
        let e = EdgeIndex(3);
        assert_eq!(e.hedges(), [Hedge(6), Hedge(7)]);
        assert_eq!(Hedge(6).inv(), Hedge(7));
        assert_eq!(Hedge(7).inv(), Hedge(6));
        assert_eq!(Hedge(7).edge(), e);
        assert!(Hedge(6).is_source());
        assert!(!Hedge(7).is_source());
    }

    #[test]
    fn involution_squares_to_identity() {
        let sigma = edge_involution(8);
        assert_eq!(sigma.map(), &[1, 0, 3, 2, 5, 4, 7, 6]);
        assert!(sigma.compose(&sigma).is_identity());
        assert_eq!(sigma.order(), Some(2));
        assert_eq!(edge_involution(0).order(), Some(1));
    }
}
