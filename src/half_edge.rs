//! # Oriented maps
//!
//! An [`OrientedMap`] is a cell decomposition of an oriented surface encoded by
//! a rotation system: the vertex permutation `vp` sends each half-edge to the
//! next half-edge counter-clockwise around its vertex. Together with the fixed
//! edge involution σ (see [`involution`]) it determines the face permutation
//! `fp = vp ∘ σ`, whose orbits are the faces.
//!
//! Vertices, faces and the genus are all derived on demand from `vp`.
//!
//! ## Mutability
//!
//! A map is either immutable or mutable. Immutable maps share their storage,
//! so [`OrientedMap::copy`] between immutable maps is a reference count bump.
//! Edits such as [`OrientedMap::swap_vp`] are refused on immutable maps with
//! [`MapError::Immutable`].
//!
//! ## Sparse maps
//!
//! [`OrientedMap::submap`] without relabelling keeps the original half-edge
//! labels. Such a map only contains the half-edges of its kept edges; every
//! other label is outside of the map and ignored by all invariants.

use std::{
    fmt::{self, Display},
    str::FromStr,
    sync::{Arc, OnceLock},
};

use bitvec::vec::BitVec;
use thiserror::Error;

use crate::{
    parser::{format_cycles, hedge_from_edge_label, parse_cycles},
    permutation::{Permutation, PermutationError},
};

pub mod algorithms;
pub mod colored;
pub mod involution;
pub mod submap;

use involution::{EdgeIndex, Hedge};

#[derive(Clone, Debug)]
struct MapData {
    vp: Permutation,
    fp: OnceLock<Permutation>,
    /// Half-edges belonging to the map, `None` when every label does.
    support: Option<BitVec>,
}

impl MapData {
    fn new(vp: Permutation, support: Option<BitVec>) -> Self {
        MapData {
            vp,
            fp: OnceLock::new(),
            support,
        }
    }

    fn contains(&self, h: usize) -> bool {
        h < self.vp.len() && self.support.as_ref().map_or(true, |s| s[h])
    }

    fn derive_fp(&self) -> Permutation {
        let map = (0..self.vp.len())
            .map(|h| if self.contains(h) { self.vp[h ^ 1] } else { h })
            .collect();
        Permutation::from_map(map)
    }
}

/// A combinatorial map given by its vertex permutation.
///
/// # Examples
///
/// ```
/// use cellmap::half_edge::OrientedMap;
///
/// // one vertex with two loops crossing each other: the torus
/// let torus = OrientedMap::new(vec![2, 3, 1, 0], true).unwrap();
/// assert_eq!(torus.num_vertices(), 1);
/// assert_eq!(torus.num_edges(), 2);
/// assert_eq!(torus.num_faces(), 1);
/// assert_eq!(torus.genus().unwrap(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct OrientedMap {
    data: Arc<MapData>,
    mutable: bool,
}

impl OrientedMap {
    // --------------------------------------------------------------------------------------------
    // Construction
    // --------------------------------------------------------------------------------------------

    /// The map without edges: a sphere with one vertex and one face.
    pub fn empty() -> Self {
        Self::from_parts(Permutation::id(0), None, false)
    }

    /// Builds an immutable map from its vertex permutation, `vp[h]` being the
    /// image of half-edge `h`.
    ///
    /// With `check` set, `vp` must have even length and be a bijection of
    /// `0..vp.len()`. Without it the data is trusted.
    pub fn new(vp: Vec<usize>, check: bool) -> Result<Self, MapError> {
        Ok(Self::from_parts(Self::vertex_permutation(vp, check)?, None, false))
    }

    /// Same as [`OrientedMap::new`] for a mutable map.
    pub fn new_mutable(vp: Vec<usize>, check: bool) -> Result<Self, MapError> {
        Ok(Self::from_parts(Self::vertex_permutation(vp, check)?, None, true))
    }

    /// Builds an immutable map from the cycles of its vertex permutation.
    ///
    /// With `edge_like` set the labels are read as edges, `e` being half-edge
    /// `2e` and `~e` half-edge `2e + 1`. Half-edges not listed are fixed, and
    /// the domain is padded to an even size.
    ///
    /// ```
    /// # use cellmap::half_edge::OrientedMap;
    /// let a = OrientedMap::from_vertex_cycles("(0,1,~0,~1)", true).unwrap();
    /// let b = OrientedMap::from_vertex_cycles("(0,2,1,3)", false).unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.genus().unwrap(), 1);
    /// ```
    pub fn from_vertex_cycles(text: &str, edge_like: bool) -> Result<Self, MapError> {
        let cycles = parse_cycles(text)
            .map_err(PermutationError::from)?
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .map(|label| {
                        if edge_like {
                            hedge_from_edge_label(label)
                                .ok_or(PermutationError::LabelTooLarge { label })
                        } else {
                            PermutationError::element_from_label(label)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut map = Permutation::from_disjoint_cycles(&cycles)?.map().to_vec();
        if map.len() % 2 == 1 {
            map.push(map.len());
        }
        Ok(Self::from_parts(Permutation::from_map(map), None, false))
    }

    /// Immutable map with vertex permutation `vp`, which must act on an even
    /// number of half-edges.
    pub fn from_permutation(vp: Permutation) -> Result<Self, MapError> {
        if vp.len() % 2 == 1 {
            return Err(MapError::OddDomain { len: vp.len() });
        }
        Ok(Self::from_parts(vp, None, false))
    }

    fn vertex_permutation(vp: Vec<usize>, check: bool) -> Result<Permutation, MapError> {
        if !check {
            return Ok(Permutation::from_map(vp));
        }
        if vp.len() % 2 == 1 {
            return Err(MapError::OddDomain { len: vp.len() });
        }
        Ok(Permutation::try_from_map(vp)?)
    }

    fn from_parts(vp: Permutation, support: Option<BitVec>, mutable: bool) -> Self {
        OrientedMap {
            data: Arc::new(MapData::new(vp, support)),
            mutable,
        }
    }

    // --------------------------------------------------------------------------------------------
    // Half-edges and permutations
    // --------------------------------------------------------------------------------------------

    pub fn vp(&self) -> &Permutation {
        &self.data.vp
    }

    /// The face permutation `vp ∘ σ`, computed once and cached.
    pub fn fp(&self) -> &Permutation {
        self.data.fp.get_or_init(|| self.data.derive_fp())
    }

    pub fn vp_of(&self, h: Hedge) -> Hedge {
        Hedge(self.vp()[h.0])
    }

    pub fn fp_of(&self, h: Hedge) -> Hedge {
        Hedge(self.fp()[h.0])
    }

    pub fn contains(&self, h: Hedge) -> bool {
        self.data.contains(h.0)
    }

    /// Returns `h` if it belongs to the map.
    pub fn check_hedge(&self, h: Hedge) -> Result<Hedge, MapError> {
        if self.contains(h) {
            Ok(h)
        } else {
            Err(MapError::HedgeOutOfRange { hedge: h })
        }
    }

    /// Half-edges of the map in increasing order.
    pub fn hedges(&self) -> impl Iterator<Item = Hedge> + '_ {
        (0..self.data.vp.len())
            .filter(|&h| self.data.contains(h))
            .map(Hedge)
    }

    /// Edges of the map in increasing order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.hedges().filter(|h| h.is_source()).map(Hedge::edge)
    }

    pub fn num_hedges(&self) -> usize {
        match &self.data.support {
            Some(support) => support.count_ones(),
            None => self.data.vp.len(),
        }
    }

    pub fn num_edges(&self) -> usize {
        self.num_hedges() / 2
    }

    /// Largest label plus one, holes of a sparse map included.
    pub fn label_bound(&self) -> usize {
        self.data.vp.len()
    }

    // --------------------------------------------------------------------------------------------
    // Vertices, faces and invariants
    // --------------------------------------------------------------------------------------------

    fn orbits(&self, perm: &Permutation) -> Vec<Vec<Hedge>> {
        let mut visited: BitVec = BitVec::repeat(false, perm.len());
        let mut orbits = Vec::new();
        for h in self.hedges() {
            if visited[h.0] {
                continue;
            }
            let mut orbit = Vec::new();
            let mut j = h.0;
            while !visited.replace(j, true) {
                orbit.push(Hedge(j));
                j = perm[j];
            }
            orbits.push(orbit);
        }
        orbits
    }

    fn count_orbits(&self, perm: &Permutation) -> usize {
        if self.num_hedges() == 0 {
            return 1;
        }
        let mut visited: BitVec = BitVec::repeat(false, perm.len());
        let mut count = 0;
        for h in self.hedges() {
            if visited[h.0] {
                continue;
            }
            count += 1;
            let mut j = h.0;
            while !visited.replace(j, true) {
                j = perm[j];
            }
        }
        count
    }

    /// Orbits of `vp`, each starting at its smallest half-edge.
    pub fn vertices(&self) -> Vec<Vec<Hedge>> {
        self.orbits(self.vp())
    }

    /// Orbits of `fp`, each starting at its smallest half-edge.
    pub fn faces(&self) -> Vec<Vec<Hedge>> {
        self.orbits(self.fp())
    }

    /// Number of vertices. The empty map counts as one vertex on the sphere.
    pub fn num_vertices(&self) -> usize {
        self.count_orbits(self.vp())
    }

    /// Number of faces. The empty map counts as one face on the sphere.
    pub fn num_faces(&self) -> usize {
        self.count_orbits(self.fp())
    }

    /// `V - E + F`.
    pub fn euler_characteristic(&self) -> isize {
        self.num_vertices() as isize - self.num_edges() as isize + self.num_faces() as isize
    }

    /// Genus from Euler's formula `V - E + F = 2 - 2g`.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidGenus`] if the formula has no non-negative integer
    /// solution, as happens for disconnected maps.
    pub fn genus(&self) -> Result<usize, MapError> {
        let euler = self.euler_characteristic();
        let twice = 2 - euler;
        if twice < 0 || twice % 2 != 0 {
            return Err(MapError::InvalidGenus { euler });
        }
        Ok((twice / 2) as usize)
    }

    /// A single face.
    pub fn is_unicellular(&self) -> bool {
        self.num_faces() == 1
    }

    /// A single vertex and a single face.
    pub fn is_reduced(&self) -> bool {
        self.num_vertices() == 1 && self.num_faces() == 1
    }

    /// Smallest half-edge around the vertex of `h`.
    pub fn vertex_id(&self, h: Hedge) -> Result<Hedge, MapError> {
        let h = self.check_hedge(h)?;
        Ok(Self::min_of_orbit(self.vp(), h))
    }

    /// Smallest half-edge around the face of `h`.
    pub fn face_id(&self, h: Hedge) -> Result<Hedge, MapError> {
        let h = self.check_hedge(h)?;
        Ok(Self::min_of_orbit(self.fp(), h))
    }

    fn min_of_orbit(perm: &Permutation, h: Hedge) -> Hedge {
        Hedge(perm.orbit(h.0).into_iter().min().unwrap_or(h.0))
    }

    /// Half-edge sets of the connected components, each sorted, listed by
    /// smallest half-edge.
    pub fn connected_components(&self) -> Vec<Vec<Hedge>> {
        let mut visited: BitVec = BitVec::repeat(false, self.label_bound());
        let mut components = vec![];

        for root in self.hedges() {
            if visited[root.0] {
                continue;
            }
            let mut component = vec![];
            let mut stack = vec![root];
            while let Some(h) = stack.pop() {
                if visited.replace(h.0, true) {
                    continue;
                }
                component.push(h);
                stack.push(self.vp_of(h));
                stack.push(h.inv());
            }
            component.sort();
            components.push(component);
        }
        components
    }

    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }

    /// The dual map: faces become vertices and vertices become faces.
    ///
    /// ```
    /// # use cellmap::half_edge::OrientedMap;
    /// let map = OrientedMap::from_vertex_cycles("(0,1,2,3)", false).unwrap();
    /// let dual = map.dual();
    /// assert_eq!(dual.num_vertices(), map.num_faces());
    /// assert_eq!(dual.num_faces(), map.num_vertices());
    /// assert_eq!(dual.dual(), map);
    /// ```
    pub fn dual(&self) -> OrientedMap {
        Self::from_parts(self.fp().clone(), self.data.support.clone(), self.mutable)
    }

    // --------------------------------------------------------------------------------------------
    // Mutability
    // --------------------------------------------------------------------------------------------

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn set_immutable(&mut self) {
        self.mutable = false;
    }

    fn assert_mutable(&self) -> Result<(), MapError> {
        if self.mutable {
            Ok(())
        } else {
            Err(MapError::Immutable)
        }
    }

    /// Exchanges the `vp` images of `h1` and `h2`.
    ///
    /// Two half-edges at the same vertex split it in two, half-edges at distinct
    /// vertices merge them.
    pub fn swap_vp(&mut self, h1: Hedge, h2: Hedge) -> Result<(), MapError> {
        self.assert_mutable()?;
        self.check_hedge(h1)?;
        self.check_hedge(h2)?;

        let data = Arc::make_mut(&mut self.data);
        data.vp.swap_images(h1.0, h2.0);
        data.fp = OnceLock::new();
        Ok(())
    }

    /// Copy of this map, mutable or not according to `mutable` (by default the
    /// same as `self`).
    ///
    /// Immutable to immutable copies share storage.
    pub fn copy(&self, mutable: Option<bool>) -> OrientedMap {
        let mutable = mutable.unwrap_or(self.mutable);
        if !self.mutable && !mutable {
            return self.clone();
        }
        OrientedMap {
            data: Arc::new(MapData::new(
                self.data.vp.clone(),
                self.data.support.clone(),
            )),
            mutable,
        }
    }

    /// Whether both maps use the same storage.
    pub fn shares_storage(&self, other: &OrientedMap) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Default for OrientedMap {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for OrientedMap {
    fn eq(&self, other: &Self) -> bool {
        self.data.vp == other.data.vp && self.data.support == other.data.support
    }
}

impl Eq for OrientedMap {}

/// Parses the cycles of the vertex permutation, plain labels.
impl FromStr for OrientedMap {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_vertex_cycles(s, false)
    }
}

/// Vertices and faces in edge-like cycle notation.
impl Display for OrientedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrientedMap(\"{}\", \"{}\")",
            format_cycles(&self.vertices(), true),
            format_cycles(&self.faces(), true)
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("Odd number of half-edges: {len}")]
    OddDomain { len: usize },
    #[error("Invalid vertex permutation: {0}")]
    InvalidPermutation(#[from] PermutationError),
    #[error("Euler characteristic {euler} does not give a non-negative integer genus")]
    InvalidGenus { euler: isize },
    #[error("Immutable map")]
    Immutable,
    #[error("Half-edge {hedge} is not in the map")]
    HedgeOutOfRange { hedge: Hedge },
    #[error("Edge {edge} is not in the map")]
    EdgeOutOfRange { edge: EdgeIndex },
    #[error("{colors} edge colors for {edges} edges")]
    ColorCountMismatch { colors: usize, edges: usize },
    #[error("Several colors for the vertex of half-edge {hedge}")]
    ConflictingVertexColor { hedge: Hedge },
}
