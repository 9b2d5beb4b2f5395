use std::collections::HashSet;

use tracing::trace;

use crate::combin::CombinationIterator;
use crate::graph::{Edge, EdgeSet, Graph};
use crate::predicate::{BalancedCheck, Predicate};
use crate::set;

/// Enumerates the distinct proper parts of one separator edge.
///
/// A part is the intersection of the edge with the union of up to `width` other graph
/// edges that touch it.
#[derive(Debug)]
struct SubedgeGenerator {
    edge: Edge,
    sources: Vec<Edge>,
    width: usize,
    combinations: CombinationIterator,
    seen: HashSet<u64>,
    current: Edge,
}

impl SubedgeGenerator {
    fn new(edge: Edge, universe: &EdgeSet, width: usize) -> Self {
        let sources: Vec<_> =
            universe.iter().filter(|f| f.name() != edge.name() && f.intersects(edge.vertices())).cloned().collect();
        let combinations = CombinationIterator::new(sources.len(), width, true);
        let mut generator =
            Self { current: edge.clone(), edge, sources, width, combinations, seen: HashSet::new() };
        generator.reset();
        generator
    }

    /// Move to the next unseen part. Returns false once every part was produced.
    fn advance(&mut self) -> bool {
        for combination in self.combinations.by_ref() {
            let union =
                set::collect_sorted(combination.iter().flat_map(|&i| self.sources[i].vertices().iter().copied()));
            let part = self.edge.restrict(&union);
            if !part.is_empty() && self.seen.insert(part.content_hash()) {
                self.current = part;
                return true;
            }
        }
        false
    }

    fn reset(&mut self) {
        self.combinations = CombinationIterator::new(self.sources.len(), self.width, true);
        self.seen.clear();
        self.seen.insert(self.edge.content_hash());
        self.current = self.edge.clone();
    }
}

/// Generates narrower variants of a separator after it failed.
///
/// Every edge of the separator is replaced by one of its parts (or kept whole), and
/// the combinations are enumerated like an odometer: the first edge runs through its
/// parts, then it is reset to the full edge and the second edge moves on, and so on.
/// Only balanced variants are returned.
///
/// ```rust
/// use hypertree::{Graph, SubedgeRefiner};
///
/// let graph = Graph::from_edges([(1, vec![1, 2, 3]), (2, vec![1, 4]), (3, vec![2, 5])]);
/// let separator = graph.edges().subset(&[0]);
/// let mut refiner = SubedgeRefiner::new(graph.edges(), &separator, 2);
///
/// let mut parts = vec![];
/// while let Some(separator) = refiner.next_separator(&graph, 10) {
///     parts.push(separator.vertices().len());
/// }
/// assert_eq!(parts, [2, 1, 1]);
/// ```
#[derive(Debug)]
pub struct SubedgeRefiner {
    generators: Vec<SubedgeGenerator>,
    exhausted: bool,
}

impl SubedgeRefiner {
    /// Create a refiner for `separator`, taking parts against the edges of `universe`.
    pub fn new(universe: &EdgeSet, separator: &EdgeSet, width: usize) -> Self {
        let generators = separator.iter().map(|e| SubedgeGenerator::new(e.clone(), universe, width)).collect();
        Self { generators, exhausted: false }
    }

    /// Return the next balanced variant of the separator, or `None` once all variants
    /// were produced.
    pub fn next_separator(&mut self, graph: &Graph, balance_factor: usize) -> Option<EdgeSet> {
        while self.advance() {
            let candidate: EdgeSet = self.generators.iter().map(|g| g.current.clone()).collect();
            if BalancedCheck.check(graph, &candidate, balance_factor) {
                trace!(separator = %candidate, "refined separator");
                return Some(candidate);
            }
        }
        None
    }

    fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        for generator in self.generators.iter_mut() {
            if generator.advance() {
                return true;
            }
            generator.reset();
        }
        self.exhausted = true;
        false
    }
}
