use tracing::{debug, info, instrument};

use crate::algorithms::{decompose_all, small_base_case, Algorithm, ParameterError, Params};
use crate::cache::Cache;
use crate::decomp::{Decomp, Node, Outcome};
use crate::graph::Graph;
use crate::index::Vertex;
use crate::predicate::ConnectionCheck;
use crate::search::Search;
use crate::set;

/// Top-down decomposition driven by connection vertices.
///
/// Each node is chosen to cover the vertices its subproblem shares with the parent node
/// and to contain at least one new vertex. The components of the node are decomposed
/// independently.
#[derive(Clone, Debug)]
pub struct DetK {
    params: Params,
}

impl DetK {
    /// Create the algorithm for the given width.
    pub fn new(width: usize) -> Result<Self, ParameterError> {
        Ok(Self { params: Params::new(width, 2)? })
    }

    /// Use `workers` parallel search workers instead of the size of the rayon pool.
    pub fn with_workers(self, workers: usize) -> Self {
        Self { params: self.params.with_workers(workers) }
    }
}

impl Algorithm for DetK {
    fn name(&self) -> &'static str {
        "DetK"
    }

    fn width(&self) -> usize {
        self.params.width
    }

    #[instrument(skip_all, fields(width = self.params.width))]
    fn find_decomposition(&self, graph: &Graph) -> Outcome {
        let run = DetKRun::new(graph, self.params, Cache::default());
        let root = run.find(graph, &[]);
        info!(found = root.is_some(), cache_entries = run.cache.len());
        root.map(|root| Decomp::new(graph.clone(), root)).into()
    }
}

/// The state of one decomposition.
pub(crate) struct DetKRun<'a> {
    graph: &'a Graph,
    params: Params,
    cache: Cache,
}

impl<'a> DetKRun<'a> {
    pub(crate) fn new(graph: &'a Graph, params: Params, cache: Cache) -> Self {
        Self { graph, params, cache }
    }

    /// Decompose `sub` such that the root bag contains `conn`.
    pub(crate) fn find(&self, sub: &Graph, conn: &[Vertex]) -> Option<Node> {
        let width = self.params.width;
        if sub.special().is_empty() && sub.edges().len() <= width {
            return Some(Node::new(sub.vertices().to_vec(), sub.edges().clone(), vec![]));
        }
        if sub.len() <= 2 {
            if let Some(node) = small_base_case(sub, conn) {
                return Some(node);
            }
        }

        let check = ConnectionCheck::new(conn.to_vec(), set::difference(sub.vertices(), conn));
        let universe = self.graph.edges().filter_vertices(sub.vertices());
        let mut search = Search::new(sub, &universe, self.params.balance_factor, width, self.params.workers());
        loop {
            search.find_next(&check);
            if search.exhausted() {
                return None;
            }
            let separator = search.separator();
            let bag = set::intersection(separator.vertices(), sub.vertices());
            let components = sub.components(&separator).into_graphs();
            if self.cache.check_negative(&separator, &components) {
                debug!(separator = %separator, "known to fail");
                continue;
            }

            match decompose_all(&components, |c| self.find(c, &set::intersection(c.vertices(), &bag))) {
                Ok(children) => {
                    for c in &components {
                        self.cache.add_positive(&separator, c);
                    }
                    return Some(Node::new(bag, separator, children));
                }
                Err(i) => {
                    debug!(separator = %separator, component = %components[i], "component failed");
                    self.cache.add_negative(&separator, &components[i]);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{cycle_graph, path_graph};

    #[test]
    fn root_covers_connection() {
        let graph = path_graph(6);
        let run = DetKRun::new(&graph, Params::new(1, 2).unwrap(), Cache::default());
        let sub = Graph::new(graph.edges().subset(&[3, 4, 5]));
        let conn = [Vertex::new(4)];
        let root = run.find(&sub, &conn).unwrap();
        assert!(root.bag().contains(&Vertex::new(4)));
        assert_eq!(root.cover().edges()[0].name().get(), 4);
        assert!(root.bag().iter().all(|v| sub.vertices().contains(v)));
    }

    #[test]
    fn failures_are_cached() {
        let graph = cycle_graph(5);
        let cache = Cache::default();
        let run = DetKRun::new(&graph, Params::new(1, 2).unwrap(), cache.clone());
        assert!(run.find(&graph, &[]).is_none());
        assert!(!cache.is_empty());
    }

    #[test]
    fn path_nodes_follow_the_path() {
        let graph = path_graph(4);
        let decomp = DetK::new(1).unwrap().find_decomposition(&graph).into_decomp().unwrap();
        assert!(decomp.is_correct(&graph));
        assert_eq!(decomp.node_count(), 4);
        assert_eq!(decomp.width(), 1);
    }
}
