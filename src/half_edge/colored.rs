//! Maps carrying data on their edges and vertices.

use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Display},
};

use itertools::Itertools;

use super::{
    involution::{EdgeIndex, Hedge},
    submap::EdgeSelection,
    MapError, OrientedMap,
};
use crate::parser::format_cycles;

/// An [`OrientedMap`] with an optional color per edge and per vertex.
///
/// Vertex colors are stored under the vertex id, the smallest half-edge
/// around the vertex.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use cellmap::half_edge::{colored::ColoredMap, involution::{EdgeIndex, Hedge}, OrientedMap};
///
/// let map = OrientedMap::from_vertex_cycles("(0,2,4)(1,3,5)", false).unwrap();
/// let vertex_colors = BTreeMap::from([(Hedge(5), "south")]);
/// let colored = ColoredMap::new(map, Some(vec![Some(1), None, Some(3)]), &vertex_colors, true).unwrap();
///
/// assert_eq!(colored.vertex_color(Hedge(3)).unwrap(), Some(&"south"));
/// assert_eq!(colored.vertex_color(Hedge(0)).unwrap(), None);
/// assert_eq!(colored.edge_color(EdgeIndex(2)).unwrap(), Some(&3));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ColoredMap<E, V> {
    map: OrientedMap,
    edge_colors: Vec<Option<E>>,
    vertex_colors: BTreeMap<Hedge, Option<V>>,
}

impl<E, V: Clone> ColoredMap<E, V> {
    /// Colors `map`.
    ///
    /// `edge_colors[i]` is the color of the `i`-th edge of `map.edges()`, so a
    /// sparse map only takes colors for the edges it keeps. With `check` set
    /// there must be exactly one entry per edge, otherwise missing entries are
    /// uncolored and extra ones dropped. Each vertex takes the color of the one
    /// of its half-edges listed in `vertex_colors`, if any.
    pub fn new(
        map: OrientedMap,
        edge_colors: Option<Vec<Option<E>>>,
        vertex_colors: &BTreeMap<Hedge, V>,
        check: bool,
    ) -> Result<Self, MapError> {
        let n_edges = map.num_edges();
        let given = match edge_colors {
            Some(colors) if check && colors.len() != n_edges => {
                return Err(MapError::ColorCountMismatch {
                    colors: colors.len(),
                    edges: n_edges,
                });
            }
            Some(colors) => colors,
            None => Vec::new(),
        };

        // stored by edge label
        let mut edge_colors: Vec<Option<E>> = Vec::new();
        edge_colors.resize_with(map.label_bound() / 2, || None);
        for (edge, color) in map.edges().zip(given) {
            edge_colors[edge.0] = color;
        }

        let mut by_vertex = BTreeMap::new();
        for vertex in map.vertices() {
            let mut color = None;
            for h in &vertex {
                if let Some(c) = vertex_colors.get(h) {
                    if color.is_some() {
                        return Err(MapError::ConflictingVertexColor { hedge: *h });
                    }
                    color = Some(c.clone());
                }
            }
            by_vertex.insert(vertex[0], color);
        }

        Ok(ColoredMap {
            map,
            edge_colors,
            vertex_colors: by_vertex,
        })
    }
}

impl<E: Clone, V: Clone> ColoredMap<E, V> {
    /// Same as [`ColoredMap::new`] with edge colors given by edge.
    pub fn from_edge_map(
        map: OrientedMap,
        edge_colors: &BTreeMap<EdgeIndex, E>,
        vertex_colors: &BTreeMap<Hedge, V>,
    ) -> Result<Self, MapError> {
        let colors = map
            .edges()
            .map(|e| edge_colors.get(&e).cloned())
            .collect();
        Self::new(map, Some(colors), vertex_colors, true)
    }

    /// Copy with the requested mutability, see [`OrientedMap::copy`].
    pub fn copy(&self, mutable: Option<bool>) -> Self {
        ColoredMap {
            map: self.map.copy(mutable),
            edge_colors: self.edge_colors.clone(),
            vertex_colors: self.vertex_colors.clone(),
        }
    }

    /// The relabeled map induced on `edges`, see [`OrientedMap::submap`].
    ///
    /// Kept edges keep their color. Each vertex of the submap has the color of
    /// the parent vertex of its smallest half-edge.
    pub fn submap<I>(&self, edges: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = EdgeIndex>,
    {
        let selection = EdgeSelection::new(&self.map, edges)?;
        let sparse = self.map.submap_of(&selection, false);
        let dense = self.map.submap_of(&selection, true);

        let edge_colors = selection
            .edges()
            .map(|e| self.edge_colors[e.0].clone())
            .collect();

        let mut vertex_colors = BTreeMap::new();
        for vertex in sparse.vertices() {
            let Some(color) = self.vertex_color(vertex[0])? else {
                continue;
            };
            if let Some(h) = selection.relabel_hedge(vertex[0]) {
                vertex_colors.insert(h, color.clone());
            }
        }

        Self::new(dense, Some(edge_colors), &vertex_colors, true)
    }
}

impl<E, V> ColoredMap<E, V> {
    pub fn map(&self) -> &OrientedMap {
        &self.map
    }

    pub fn is_mutable(&self) -> bool {
        self.map.is_mutable()
    }

    pub fn set_immutable(&mut self) {
        self.map.set_immutable();
    }

    pub fn edge_color(&self, edge: EdgeIndex) -> Result<Option<&E>, MapError> {
        if !self.map.contains(edge.source()) {
            return Err(MapError::EdgeOutOfRange { edge });
        }
        Ok(self.edge_colors[edge.0].as_ref())
    }

    pub fn vertex_color(&self, h: Hedge) -> Result<Option<&V>, MapError> {
        let id = self.map.vertex_id(h)?;
        Ok(self.vertex_colors.get(&id).and_then(Option::as_ref))
    }

    /// Recolors the edge of `h`.
    pub fn set_edge_color(&mut self, h: Hedge, color: Option<E>) -> Result<(), MapError> {
        self.ensure_mutable()?;
        let h = self.map.check_hedge(h)?;
        self.edge_colors[h.edge().0] = color;
        Ok(())
    }

    /// Recolors the vertex of `h`.
    pub fn set_vertex_color(&mut self, h: Hedge, color: Option<V>) -> Result<(), MapError> {
        self.ensure_mutable()?;
        let id = self.map.vertex_id(h)?;
        self.vertex_colors.insert(id, color);
        Ok(())
    }

    fn ensure_mutable(&self) -> Result<(), MapError> {
        if self.map.is_mutable() {
            Ok(())
        } else {
            Err(MapError::Immutable)
        }
    }
}

impl<E: Debug, V: Debug> Display for ColoredMap<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge_colors = self.map.edges().map(|e| format!("{:?}", self.edge_colors[e.0]));
        let vertex_colors = self
            .vertex_colors
            .iter()
            .map(|(h, color)| format!("{h}: {color:?}"));
        write!(
            f,
            "ColoredMap(\"{}\", \"{}\", edge colors: [{}], vertex colors: {{{}}})",
            format_cycles(&self.map.vertices(), true),
            format_cycles(&self.map.faces(), true),
            edge_colors.format(", "),
            vertex_colors.format(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prism() -> OrientedMap {
        // two vertices joined by three parallel edges
        OrientedMap::from_vertex_cycles("(0,1,2)(~0,~1,~2)", true).unwrap()
    }

    #[test]
    fn vertex_colors_follow_the_orbit() {
        let colors = BTreeMap::from([(Hedge(4), 'a'), (Hedge(3), 'b')]);
        let colored: ColoredMap<u8, char> = ColoredMap::new(prism(), None, &colors, true).unwrap();
        for h in [0, 2, 4] {
            assert_eq!(colored.vertex_color(Hedge(h)).unwrap(), Some(&'a'));
        }
        for h in [1, 3, 5] {
            assert_eq!(colored.vertex_color(Hedge(h)).unwrap(), Some(&'b'));
        }
        assert_eq!(colored.edge_color(EdgeIndex(1)).unwrap(), None);
        assert_eq!(
            colored.vertex_color(Hedge(6)),
            Err(MapError::HedgeOutOfRange { hedge: Hedge(6) })
        );
    }

    #[test]
    fn rejects_bad_colorings() {
        let conflict = BTreeMap::from([(Hedge(0), 1), (Hedge(2), 2)]);
        assert_eq!(
            ColoredMap::<(), _>::new(prism(), None, &conflict, true),
            Err(MapError::ConflictingVertexColor { hedge: Hedge(2) })
        );

        let none: BTreeMap<Hedge, ()> = BTreeMap::new();
        assert_eq!(
            ColoredMap::new(prism(), Some(vec![Some(0); 2]), &none, true),
            Err(MapError::ColorCountMismatch {
                colors: 2,
                edges: 3
            })
        );
        let unchecked = ColoredMap::new(prism(), Some(vec![Some(0); 2]), &none, false).unwrap();
        assert_eq!(unchecked.edge_color(EdgeIndex(2)).unwrap(), None);
    }

    #[test]
    fn sparse_maps_take_one_color_per_kept_edge() {
        let sparse = prism().submap([EdgeIndex(0), EdgeIndex(2)], false).unwrap();
        assert_eq!(sparse.num_edges(), 2);
        assert_eq!(sparse.label_bound(), 6);

        let none: BTreeMap<Hedge, ()> = BTreeMap::new();
        let colors = Some(vec![Some('x'), Some('z')]);
        let colored = ColoredMap::new(sparse.clone(), colors, &none, true).unwrap();
        assert_eq!(colored.edge_color(EdgeIndex(0)).unwrap(), Some(&'x'));
        assert_eq!(colored.edge_color(EdgeIndex(2)).unwrap(), Some(&'z'));
        assert_eq!(
            colored.edge_color(EdgeIndex(1)),
            Err(MapError::EdgeOutOfRange { edge: EdgeIndex(1) })
        );

        assert_eq!(
            ColoredMap::new(sparse.clone(), Some(vec![Some('x'); 3]), &none, true),
            Err(MapError::ColorCountMismatch {
                colors: 3,
                edges: 2
            })
        );

        let by_edge = BTreeMap::from([(EdgeIndex(2), 'z')]);
        let colored = ColoredMap::from_edge_map(sparse, &by_edge, &none).unwrap();
        assert_eq!(colored.edge_color(EdgeIndex(0)).unwrap(), None);
        assert_eq!(colored.edge_color(EdgeIndex(2)).unwrap(), Some(&'z'));
    }

    #[test]
    fn setters_need_a_mutable_map() {
        let none: BTreeMap<Hedge, &str> = BTreeMap::new();
        let mut colored = ColoredMap::new(prism(), None, &none, true).unwrap();
        assert_eq!(
            colored.set_edge_color(Hedge(0), Some(7)),
            Err(MapError::Immutable)
        );

        let mut colored = colored.copy(Some(true));
        colored.set_edge_color(Hedge(3), Some(7)).unwrap();
        colored.set_vertex_color(Hedge(5), Some("b")).unwrap();
        assert_eq!(colored.edge_color(EdgeIndex(1)).unwrap(), Some(&7));
        assert_eq!(colored.vertex_color(Hedge(1)).unwrap(), Some(&"b"));

        colored.set_immutable();
        assert_eq!(
            colored.set_vertex_color(Hedge(0), None),
            Err(MapError::Immutable)
        );
    }

    #[test]
    fn submap_carries_colors() {
        let edges = BTreeMap::from([(EdgeIndex(0), 10), (EdgeIndex(1), 11), (EdgeIndex(2), 12)]);
        let vertices = BTreeMap::from([(Hedge(0), "a"), (Hedge(5), "b")]);
        let colored = ColoredMap::from_edge_map(prism(), &edges, &vertices).unwrap();

        let sub = colored.submap([EdgeIndex(2), EdgeIndex(0)]).unwrap();
        assert_eq!(sub.map().num_edges(), 2);
        assert_eq!(sub.edge_color(EdgeIndex(0)).unwrap(), Some(&10));
        assert_eq!(sub.edge_color(EdgeIndex(1)).unwrap(), Some(&12));
        assert_eq!(sub.vertex_color(Hedge(2)).unwrap(), Some(&"a"));
        assert_eq!(sub.vertex_color(Hedge(3)).unwrap(), Some(&"b"));
    }

    #[test]
    fn display() {
        let torus = OrientedMap::from_vertex_cycles("(0,1,~0,~1)", true).unwrap();
        let vertices = BTreeMap::from([(Hedge(3), "v")]);
        let colored = ColoredMap::new(torus, Some(vec![Some("x"), None]), &vertices, true).unwrap();
        insta::assert_snapshot!(
            colored.to_string(),
            @r#"ColoredMap("(0,1,~0,~1)", "(0,~1,~0,1)", edge colors: [Some("x"), None], vertex colors: {0: Some("v")})"#
        );
    }
}
