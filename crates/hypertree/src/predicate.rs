use crate::graph::{EdgeSet, Graph};
use crate::index::Vertex;
use crate::set;

/// Decides whether a candidate separator is acceptable.
///
/// Predicates are evaluated concurrently by the search workers and must not have side
/// effects.
pub trait Predicate: Sync {
    /// Returns whether `separator` is acceptable for `graph`.
    fn check(&self, graph: &Graph, separator: &EdgeSet, balance_factor: usize) -> bool;
}

/// The largest component weight that still counts as balanced.
#[inline]
pub(crate) fn balance_threshold(weight: usize, balance_factor: usize) -> usize {
    weight - weight.div_ceil(balance_factor)
}

/// Accepts balanced separators.
///
/// Every component must weigh at most `weight(graph) * (bf - 1) / bf`. A separator whose
/// vertices inside the graph equal one of the special edges is rejected, as it would only
/// repeat a boundary that is already fixed.
#[derive(Copy, Clone, Debug, Default)]
pub struct BalancedCheck;

impl Predicate for BalancedCheck {
    fn check(&self, graph: &Graph, separator: &EdgeSet, balance_factor: usize) -> bool {
        let inside = set::intersection(separator.vertices(), graph.vertices());
        if graph.special().iter().any(|s| s.vertices() == inside.as_slice()) {
            return false;
        }
        let threshold = balance_threshold(graph.len(), balance_factor);
        graph.label_components(separator).weights().into_iter().all(|w| w <= threshold)
    }
}

/// Accepts parent separators for a fixed child in the log-depth scheme.
///
/// Exactly one component of the separator, the low component, may exceed the balance
/// threshold. The low component must not contain connection vertices outside the
/// separator, and where it touches the separator it must be covered by the child.
#[derive(Clone, Debug)]
pub struct ParentCheck {
    conn: Vec<Vertex>,
    child: Vec<Vertex>,
}

impl ParentCheck {
    /// Create the predicate for the sorted `conn` vertices and the sorted `child` vertices.
    pub fn new(conn: Vec<Vertex>, child: Vec<Vertex>) -> Self {
        debug_assert!(conn.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(child.windows(2).all(|w| w[0] < w[1]));
        Self { conn, child }
    }
}

impl Predicate for ParentCheck {
    fn check(&self, graph: &Graph, separator: &EdgeSet, balance_factor: usize) -> bool {
        let threshold = balance_threshold(graph.len(), balance_factor);
        let labeling = graph.label_components(separator);

        let mut heavy = labeling.weights().into_iter().enumerate().filter(|(_, w)| *w > threshold).map(|(i, _)| i);
        let (Some(low), None) = (heavy.next(), heavy.next()) else {
            return false;
        };

        let low_vertices = labeling.vertices(graph, low);
        let sep = separator.vertices();
        set::is_subset(&set::intersection(&self.conn, &low_vertices), sep)
            && set::is_subset(
                &set::intersection(&low_vertices, sep),
                &set::intersection(&self.child, &low_vertices),
            )
    }
}

/// Accepts separators that cover the connection vertices and reach into the component.
///
/// Used by the top-down search, where a node has to contain the vertices it shares with
/// its parent and must make progress on the remaining vertices.
#[derive(Clone, Debug)]
pub struct ConnectionCheck {
    conn: Vec<Vertex>,
    component: Vec<Vertex>,
}

impl ConnectionCheck {
    /// Create the predicate for the sorted `conn` vertices and the sorted `component`
    /// vertices.
    pub fn new(conn: Vec<Vertex>, component: Vec<Vertex>) -> Self {
        Self { conn, component }
    }
}

impl Predicate for ConnectionCheck {
    fn check(&self, _: &Graph, separator: &EdgeSet, _: usize) -> bool {
        let vertices = separator.vertices();
        set::is_subset(&self.conn, vertices) && set::intersects(vertices, &self.component)
    }
}
