use std::collections::HashSet;

use tracing::{debug, info, instrument, trace};

use crate::algorithms::{decompose_all, small_base_case, Algorithm, ParameterError, Params};
use crate::cache::Cache;
use crate::decomp::{Decomp, Node, Outcome};
use crate::graph::{EdgeSet, Graph};
use crate::index::Vertex;
use crate::predicate::{balance_threshold, BalancedCheck, ParentCheck};
use crate::search::Search;
use crate::set;

/// Decomposition with logarithmic recursion depth.
///
/// A balanced child separator is searched first. If it covers the connection vertices,
/// it becomes the root. Otherwise, a parent separator is searched whose only heavy
/// component, the low component, hangs below the child. The part above the child and
/// the components of the child inside the low component are then decomposed
/// independently.
#[derive(Clone, Debug)]
pub struct LogK {
    params: Params,
}

impl LogK {
    /// Create the algorithm for the given width and balance factor.
    pub fn new(width: usize, balance_factor: usize) -> Result<Self, ParameterError> {
        Ok(Self { params: Params::new(width, balance_factor)? })
    }

    /// Use `workers` parallel search workers instead of the size of the rayon pool.
    pub fn with_workers(self, workers: usize) -> Self {
        Self { params: self.params.with_workers(workers) }
    }
}

impl Algorithm for LogK {
    fn name(&self) -> &'static str {
        "LogK"
    }

    fn width(&self) -> usize {
        self.params.width
    }

    #[instrument(skip_all, fields(width = self.params.width, balance_factor = self.params.balance_factor))]
    fn find_decomposition(&self, graph: &Graph) -> Outcome {
        let run = LogKRun { graph, params: self.params, cache: Cache::default() };
        let root = run.find(graph, &[]);
        info!(found = root.is_some(), cache_entries = run.cache.len());
        root.map(|root| Decomp::new(graph.clone(), root)).into()
    }
}

struct LogKRun<'a> {
    graph: &'a Graph,
    params: Params,
    cache: Cache,
}

impl LogKRun<'_> {
    /// A single node covering all edges and special edges, if they fit into the width.
    fn single_node(&self, sub: &Graph) -> Option<Node> {
        let mut seen = HashSet::new();
        let edges = sub.edges().iter().chain(sub.special().iter().flat_map(EdgeSet::iter));
        let cover: EdgeSet = edges.filter(|e| seen.insert(*e)).cloned().collect();
        (cover.len() <= self.params.width).then(|| Node::new(sub.vertices().to_vec(), cover, vec![]))
    }

    /// Decompose `sub` such that the root bag contains `conn`.
    fn find(&self, sub: &Graph, conn: &[Vertex]) -> Option<Node> {
        if sub.len() <= 2 {
            if let Some(node) = small_base_case(sub, conn).or_else(|| self.single_node(sub)) {
                return Some(node);
            }
        }
        if sub.special().is_empty() && sub.edges().len() <= self.params.width {
            return Some(Node::new(sub.vertices().to_vec(), sub.edges().clone(), vec![]));
        }

        let Params { width, balance_factor, .. } = self.params;
        let universe = self.graph.edges().filter_vertices(sub.vertices());
        let mut children = Search::new(sub, &universe, balance_factor, width, self.params.workers());
        loop {
            children.find_next(&BalancedCheck);
            if children.exhausted() {
                trace!("no child separator left");
                return None;
            }
            let child = children.separator();
            let node = if set::is_subset(conn, child.vertices()) {
                self.root_case(sub, &child)
            } else {
                self.parent_case(sub, conn, &child, &universe)
            };
            if node.is_some() {
                return node;
            }
        }
    }

    fn root_case(&self, sub: &Graph, child: &EdgeSet) -> Option<Node> {
        debug!(separator = %child, "root separator");
        let bag = set::intersection(child.vertices(), sub.vertices());
        let components = sub.components(child).into_graphs();
        let children = self.find_below(child, &components, &bag)?;
        Some(Node::new(bag, child.clone(), children))
    }

    fn parent_case(&self, sub: &Graph, conn: &[Vertex], child: &EdgeSet, universe: &EdgeSet) -> Option<Node> {
        let Params { width, balance_factor, .. } = self.params;
        let threshold = balance_threshold(sub.len(), balance_factor);
        let check = ParentCheck::new(conn.to_vec(), child.vertices().to_vec());
        let mut parents = Search::new(sub, universe, balance_factor, width, self.params.workers());
        loop {
            parents.find_next(&check);
            if parents.exhausted() {
                return None;
            }
            let parent = parents.separator();
            let components = sub.components(&parent);
            let low = components.graphs().iter().position(|c| c.len() > threshold).expect("a parent has a low component");
            let low_graph = &components.graphs()[low];

            let child_bag = set::intersection(child.vertices(), low_graph.vertices());
            assert!(set::is_subset(&set::intersection(low_graph.vertices(), parent.vertices()), &child_bag));

            let mut up_edges = components.isolated().to_vec();
            let mut up_special = components.isolated_special().to_vec();
            for (i, c) in components.graphs().iter().enumerate() {
                if i != low {
                    up_edges.extend(c.edges().iter().cloned());
                    up_special.extend(c.special().iter().cloned());
                }
            }
            up_special.push(child.cut_vertices(low_graph.vertices()));
            let up = Graph::with_special(EdgeSet::new(up_edges), up_special);
            if up.len() >= sub.len() {
                continue;
            }
            debug!(parent = %parent, child = %child, "parent separator");

            let low_components = low_graph.components(child).into_graphs();
            let (up_root, low_roots) =
                rayon::join(|| self.find(&up, conn), || self.find_below(child, &low_components, &child_bag));
            let (Some(mut up_root), Some(low_roots)) = (up_root, low_roots) else {
                continue;
            };

            let attach = up_root
                .find_mut(&|n: &Node| set::is_subset(&child_bag, &n.bag))
                .expect("the upper part contains the child bag");
            if attach.bag == child_bag {
                attach.children.extend(low_roots);
            } else {
                attach.children.push(Node::new(child_bag, child.clone(), low_roots));
            }
            return Some(up_root);
        }
    }

    /// Decompose the components of `separator`, connecting each to `bag`.
    fn find_below(&self, separator: &EdgeSet, components: &[Graph], bag: &[Vertex]) -> Option<Vec<Node>> {
        if self.cache.check_negative(separator, components) {
            debug!(separator = %separator, "known to fail");
            return None;
        }
        match decompose_all(components, |c| self.find(c, &set::intersection(c.vertices(), bag))) {
            Ok(roots) => Some(roots),
            Err(i) => {
                self.cache.add_negative(separator, &components[i]);
                None
            }
        }
    }
}
