use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::index::{EdgeName, Vertex};
use crate::set;

/// A hyperedge: a named set of vertices.
///
/// The vertices are kept sorted and free of duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    name: EdgeName,
    vertices: Vec<Vertex>,
}

impl Edge {
    /// Create a new edge from raw identifiers.
    ///
    /// ```rust
    /// use hypertree::{Edge, Vertex};
    ///
    /// let edge = Edge::new(1, [3, 1, 2, 3]);
    /// assert_eq!(edge.vertices(), &[Vertex::new(1), Vertex::new(2), Vertex::new(3)]);
    /// ```
    pub fn new(name: u32, vertices: impl IntoIterator<Item = u32>) -> Self {
        Self::from_vertices(EdgeName::new(name), vertices.into_iter().map(Vertex::new))
    }

    /// Create a new edge.
    pub fn from_vertices(name: EdgeName, vertices: impl IntoIterator<Item = Vertex>) -> Self {
        Self { name, vertices: set::collect_sorted(vertices) }
    }

    /// Return the name of the edge.
    #[inline(always)]
    pub fn name(&self) -> EdgeName {
        self.name
    }

    /// Return the sorted vertices of the edge.
    #[inline(always)]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Return the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns whether the edge has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns whether the edge shares a vertex with the sorted `vertices`.
    pub fn intersects(&self, vertices: &[Vertex]) -> bool {
        set::intersects(&self.vertices, vertices)
    }

    /// The part of this edge inside the sorted `vertices`. The name is kept.
    pub(crate) fn restrict(&self, vertices: &[Vertex]) -> Edge {
        Edge { name: self.name, vertices: set::intersection(&self.vertices, vertices) }
    }

    pub(crate) fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}

#[derive(Default)]
struct Memo {
    vertices: OnceLock<Vec<Vertex>>,
    hash: OnceLock<u64>,
}

/// An immutable, ordered collection of edges.
///
/// The union of the vertices and the content hash are computed on first access and
/// shared between clones.
#[derive(Clone)]
pub struct EdgeSet {
    edges: Arc<[Edge]>,
    memo: Arc<Memo>,
}

impl EdgeSet {
    /// Create a new edge set.
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges: edges.into(), memo: Arc::default() }
    }

    /// Return the number of edges.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the set has no edges.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Return the edges as a slice.
    #[inline(always)]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Return an iterator over the edges.
    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    /// Return the sorted union of the vertices of all edges.
    pub fn vertices(&self) -> &[Vertex] {
        self.memo.vertices.get_or_init(|| set::collect_sorted(self.edges.iter().flat_map(|e| e.vertices.iter().copied())))
    }

    /// Return the edges at the given positions.
    pub fn subset(&self, indices: &[usize]) -> EdgeSet {
        indices.iter().map(|&i| self.edges[i].clone()).collect()
    }

    /// Return the edges that share at least one vertex with the sorted `vertices`.
    pub fn filter_vertices(&self, vertices: &[Vertex]) -> EdgeSet {
        self.edges.iter().filter(|e| e.intersects(vertices)).cloned().collect()
    }

    /// Return the non-empty parts of the edges inside the sorted `vertices`.
    ///
    /// Parts with identical vertex sets are only kept once.
    pub fn cut_vertices(&self, vertices: &[Vertex]) -> EdgeSet {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .map(|e| e.restrict(vertices))
            .filter(|e| !e.is_empty() && seen.insert(e.vertices.clone()))
            .collect()
    }

    /// An order independent hash of the edges.
    pub fn content_hash(&self) -> u64 {
        *self.memo.hash.get_or_init(|| self.edges.iter().fold(0_u64, |h, e| h.wrapping_add(e.content_hash())))
    }
}

impl Default for EdgeSet {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = Edge>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

impl PartialEq for EdgeSet {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl Eq for EdgeSet {}

impl Debug for EdgeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.edges.iter()).finish()
    }
}

impl Display for EdgeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, e) in self.edges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", e.name)?;
        }
        f.write_str("}")
    }
}

/// A hypergraph, possibly carrying special edges.
///
/// A special edge stands in for a boundary that was already fixed by an enclosing
/// separator. It takes part in the vertex universe and in the components, but it is
/// never chosen as part of a new separator.
#[derive(Clone, Default)]
pub struct Graph {
    edges: EdgeSet,
    special: Vec<EdgeSet>,
    vertices: OnceLock<Vec<Vertex>>,
}

impl Graph {
    /// Create a new graph without special edges.
    pub fn new(edges: EdgeSet) -> Self {
        Self::with_special(edges, vec![])
    }

    /// Create a new graph with special edges.
    pub fn with_special(edges: EdgeSet, special: Vec<EdgeSet>) -> Self {
        Self { edges, special, vertices: OnceLock::new() }
    }

    /// Create a graph from `(name, vertices)` pairs.
    ///
    /// ```rust
    /// use hypertree::Graph;
    ///
    /// let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3])]);
    /// assert_eq!(graph.len(), 2);
    /// assert_eq!(graph.vertices().len(), 3);
    /// ```
    pub fn from_edges<I>(edges: impl IntoIterator<Item = (u32, I)>) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self::new(edges.into_iter().map(|(name, vertices)| Edge::new(name, vertices)).collect())
    }

    /// Return the edges.
    #[inline(always)]
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    /// Return the special edges.
    #[inline(always)]
    pub fn special(&self) -> &[EdgeSet] {
        &self.special
    }

    /// Return a copy of this graph with `separator` added as a special edge.
    pub fn add_special(&self, separator: EdgeSet) -> Graph {
        let mut special = self.special.clone();
        special.push(separator);
        Graph::with_special(self.edges.clone(), special)
    }

    /// The weight of the graph: the number of edges plus the number of special edges.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.edges.len() + self.special.len()
    }

    /// Returns whether the graph has neither edges nor special edges.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the sorted union of the vertices of all edges and special edges.
    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.get_or_init(|| {
            let special = self.special.iter().flat_map(|s| s.vertices().iter().copied());
            set::collect_sorted(self.edges.vertices().iter().copied().chain(special))
        })
    }

    /// An order independent hash of the edges and special edges.
    pub fn content_hash(&self) -> u64 {
        self.special.iter().fold(self.edges.content_hash(), |h, s| h.wrapping_add(s.content_hash().rotate_left(17)))
    }
}

impl Debug for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph").field("edges", &self.edges).field("special", &self.special).finish()
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "edges {}", self.edges)?;
        if !self.special.is_empty() {
            f.write_str(" special [")?;
            for (i, s) in self.special.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{s}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vertices(xs: &[u32]) -> Vec<Vertex> {
        xs.iter().copied().map(Vertex::new).collect()
    }

    #[test]
    fn edge_set_vertices_and_subset() {
        let edges: EdgeSet = [Edge::new(1, [1, 2]), Edge::new(2, [2, 3]), Edge::new(3, [5, 4])].into_iter().collect();
        assert_eq!(edges.vertices(), vertices(&[1, 2, 3, 4, 5]));
        let sub = edges.subset(&[0, 2]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.vertices(), vertices(&[1, 2, 4, 5]));
        assert_eq!(format!("{sub}"), "{1, 3}");
    }

    #[test]
    fn filter_and_cut() {
        let edges: EdgeSet = [Edge::new(1, [1, 2]), Edge::new(2, [2, 3]), Edge::new(3, [4, 5])].into_iter().collect();
        let filtered = edges.filter_vertices(&vertices(&[3, 4]));
        assert_eq!(filtered.iter().map(|e| e.name().get()).collect::<Vec<_>>(), [2, 3]);

        let cut = edges.cut_vertices(&vertices(&[2, 4]));
        // edges 1 and 2 are both cut down to {2}
        assert_eq!(cut.len(), 2);
        assert_eq!(cut.edges()[0], Edge::new(1, [2]));
        assert_eq!(cut.edges()[1], Edge::new(3, [4]));
    }

    #[test]
    fn content_hash_is_order_independent() {
        let a: EdgeSet = [Edge::new(1, [1, 2]), Edge::new(2, [2, 3])].into_iter().collect();
        let b: EdgeSet = [Edge::new(2, [3, 2]), Edge::new(1, [1, 2])].into_iter().collect();
        let c: EdgeSet = [Edge::new(1, [1, 2]), Edge::new(2, [2])].into_iter().collect();
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn graph_with_special() {
        let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3])]);
        let special: EdgeSet = [Edge::new(3, [3, 4])].into_iter().collect();
        let extended = graph.add_special(special);
        assert_eq!(graph.len(), 2);
        assert_eq!(extended.len(), 3);
        assert_eq!(extended.vertices(), vertices(&[1, 2, 3, 4]));
        assert_ne!(graph.content_hash(), extended.content_hash());
    }
}
