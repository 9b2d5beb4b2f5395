use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::trace;

use crate::combin::{split, CombinationIterator};
use crate::graph::{EdgeSet, Graph};
use crate::predicate::Predicate;

/// A parallel search for separators.
///
/// The search owns a set of striding [CombinationIterator]s over the positions of
/// `edges`. Each call to [Search::find_next] runs one worker per iterator on the rayon
/// pool. The first worker that finds an acceptable subset publishes it and stops the
/// others. The iterators keep their state between calls, so the search resumes where it
/// stopped.
///
/// ```rust
/// use hypertree::{BalancedCheck, Graph, Search};
///
/// let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3]), (3, vec![3, 4]), (4, vec![4, 5])]);
/// let mut search = Search::new(&graph, graph.edges(), 2, 1, 2);
///
/// search.find_next(&BalancedCheck);
/// assert!(!search.exhausted());
/// assert_eq!(search.separator().len(), 1);
/// ```
#[derive(Debug)]
pub struct Search<'a> {
    graph: &'a Graph,
    edges: &'a EdgeSet,
    balance_factor: usize,
    generators: Vec<CombinationIterator>,
    result: Vec<usize>,
    exhausted: bool,
}

impl<'a> Search<'a> {
    /// Create a search over the subsets of at most `width` edges of `edges` with
    /// `workers` parallel workers.
    pub fn new(graph: &'a Graph, edges: &'a EdgeSet, balance_factor: usize, width: usize, workers: usize) -> Self {
        Self::with_generators(graph, edges, balance_factor, split(edges.len(), width, workers.max(1), true))
    }

    /// Create a search from explicit generators.
    pub fn with_generators(
        graph: &'a Graph,
        edges: &'a EdgeSet,
        balance_factor: usize,
        generators: Vec<CombinationIterator>,
    ) -> Self {
        Self { graph, edges, balance_factor, generators, result: vec![], exhausted: false }
    }

    /// Search for the next subset accepted by `predicate`.
    ///
    /// Afterwards, either [Search::result] holds the positions of the found subset, or
    /// [Search::exhausted] is true and the result is empty.
    pub fn find_next<P: Predicate + ?Sized>(&mut self, predicate: &P) {
        let finished = AtomicBool::new(false);
        let winner: Mutex<Option<Vec<usize>>> = Mutex::new(None);
        let (graph, edges, balance_factor) = (self.graph, self.edges, self.balance_factor);

        rayon::scope(|s| {
            for generator in self.generators.iter_mut() {
                let (finished, winner) = (&finished, &winner);
                s.spawn(move |_| {
                    while !finished.load(Ordering::Acquire) {
                        let Some(candidate) = generator.peek().map(|c| edges.subset(c)) else {
                            return;
                        };
                        if predicate.check(graph, &candidate, balance_factor) {
                            if finished.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                                let combination = generator.peek().map(<[usize]>::to_vec);
                                generator.confirm();
                                *winner.lock() = combination;
                            }
                            return;
                        }
                        generator.confirm();
                    }
                });
            }
        });

        match winner.into_inner() {
            Some(result) => {
                trace!(separator = ?result, "found separator");
                self.result = result;
            }
            None => {
                trace!("search exhausted");
                self.result.clear();
                self.exhausted = true;
            }
        }
    }

    /// The positions of the last found subset.
    pub fn result(&self) -> &[usize] {
        &self.result
    }

    /// The edges of the last found subset.
    pub fn separator(&self) -> EdgeSet {
        self.edges.subset(&self.result)
    }

    /// Returns whether every subset was visited.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }
}
