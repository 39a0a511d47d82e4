//! Maps induced on a subset of the edges.
//!
//! The rotation around a vertex of the sub-map is obtained by skipping the
//! removed half-edges: `vp'(h)` is the first kept half-edge met while iterating
//! `vp` from `vp(h)`. Since `h` itself is kept the walk stops at the latest
//! once the orbit closes.

use bitvec::vec::BitVec;

use super::{
    involution::{EdgeIndex, Hedge},
    MapError, OrientedMap,
};
use crate::permutation::Permutation;

/// A set of edges of a map, with the relabelling that compacts them.
///
/// Kept edge `e` is renumbered to `e` minus the number of removed edge ids
/// smaller than `e`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeSelection {
    kept: BitVec,
    /// `new_index[e]` is the compacted id of edge `e`, meaningful when kept.
    new_index: Vec<usize>,
}

impl EdgeSelection {
    /// Collects `edges` (in any order, repeats ignored) of `map`.
    pub fn new<I>(map: &OrientedMap, edges: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = EdgeIndex>,
    {
        let n_edges = map.label_bound() / 2;
        let mut kept: BitVec = BitVec::repeat(false, n_edges);
        for edge in edges {
            if !map.contains(edge.source()) {
                return Err(MapError::EdgeOutOfRange { edge });
            }
            kept.set(edge.0, true);
        }

        let mut new_index = Vec::with_capacity(n_edges);
        let mut next = 0;
        for e in 0..n_edges {
            new_index.push(next);
            if kept[e] {
                next += 1;
            }
        }

        Ok(EdgeSelection { kept, new_index })
    }

    pub fn contains(&self, edge: EdgeIndex) -> bool {
        edge.0 < self.kept.len() && self.kept[edge.0]
    }

    pub fn contains_hedge(&self, h: Hedge) -> bool {
        self.contains(h.edge())
    }

    pub fn len(&self) -> usize {
        self.kept.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.not_any()
    }

    /// Kept edges in increasing order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.kept.iter_ones().map(EdgeIndex)
    }

    /// Id of a kept edge after compaction.
    pub fn relabel_edge(&self, edge: EdgeIndex) -> Option<EdgeIndex> {
        self.contains(edge).then(|| EdgeIndex(self.new_index[edge.0]))
    }

    /// Label of a kept half-edge after compaction, keeping its side.
    pub fn relabel_hedge(&self, h: Hedge) -> Option<Hedge> {
        self.relabel_edge(h.edge())
            .map(|e| if h.is_source() { e.source() } else { e.sink() })
    }
}

impl OrientedMap {
    /// The map induced on `edges`.
    ///
    /// Without `relabel` the half-edges keep their labels and the result is a
    /// sparse map. With `relabel` they are renumbered densely in increasing
    /// order, see [`EdgeSelection`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cellmap::half_edge::{involution::EdgeIndex, OrientedMap};
    ///
    /// let map = OrientedMap::from_vertex_cycles("(0,1,2)(~0,~1,~2)", true).unwrap();
    /// let sub = map.submap([EdgeIndex(0), EdgeIndex(2)], true).unwrap();
    /// assert_eq!(sub.num_edges(), 2);
    /// assert_eq!(sub.vertices().len(), 2);
    /// assert_eq!(sub.to_string(), "OrientedMap(\"(0,1)(~0,~1)\", \"(0,~1)(~0,1)\")");
    /// ```
    pub fn submap<I>(&self, edges: I, relabel: bool) -> Result<OrientedMap, MapError>
    where
        I: IntoIterator<Item = EdgeIndex>,
    {
        let selection = EdgeSelection::new(self, edges)?;
        Ok(self.submap_of(&selection, relabel))
    }

    /// Same as [`OrientedMap::submap`] for an existing selection of this map.
    pub fn submap_of(&self, selection: &EdgeSelection, relabel: bool) -> OrientedMap {
        let vp = self.vp();
        let len = self.label_bound();

        let mut map: Vec<usize> = (0..len).collect();
        for h in (0..len).filter(|&h| selection.contains_hedge(Hedge(h))) {
            let mut next = vp[h];
            while !selection.contains_hedge(Hedge(next)) {
                next = vp[next];
            }
            map[h] = next;
        }

        if relabel {
            let mut dense = vec![0; 2 * selection.len()];
            for h in (0..len).map(Hedge).filter(|&h| selection.contains_hedge(h)) {
                let from = selection.relabel_hedge(h);
                let to = selection.relabel_hedge(Hedge(map[h.0]));
                if let (Some(from), Some(to)) = (from, to) {
                    dense[from.0] = to.0;
                }
            }
            return OrientedMap::from_parts(Permutation::from_map(dense), None, false);
        }

        let support: BitVec = (0..len)
            .map(|h| selection.contains_hedge(Hedge(h)))
            .collect();
        let support = if support.all() { None } else { Some(support) };
        OrientedMap::from_parts(Permutation::from_map(map), support, false)
    }
}
