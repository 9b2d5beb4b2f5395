use tracing::{debug, info, instrument, trace};

use crate::algorithms::detk::DetKRun;
use crate::algorithms::{combine, decompose_all, small_base_case, Algorithm, ParameterError, Params};
use crate::cache::Cache;
use crate::combin::split;
use crate::decomp::{Decomp, Node, Outcome};
use crate::graph::{EdgeSet, Graph};
use crate::predicate::BalancedCheck;
use crate::search::Search;
use crate::subedge::SubedgeRefiner;

/// Balanced separators drawn from all edges of the graph that touch the subproblem.
///
/// Separators consist of exactly `width` edges, or of all edges if there are fewer.
#[derive(Clone, Debug)]
pub struct BalSepGlobal {
    params: Params,
}

/// Balanced separators drawn from the edges of the graph cut down to the vertices of
/// the subproblem.
#[derive(Clone, Debug)]
pub struct BalSepLocal {
    params: Params,
}

/// Balanced separators for the first `depth` levels, then [DetK](super::DetK).
#[derive(Clone, Debug)]
pub struct BalSepHybrid {
    params: Params,
    depth: usize,
}

impl BalSepGlobal {
    /// Create the algorithm for the given width and balance factor.
    pub fn new(width: usize, balance_factor: usize) -> Result<Self, ParameterError> {
        Ok(Self { params: Params::new(width, balance_factor)? })
    }

    /// Use `workers` parallel search workers instead of the size of the rayon pool.
    pub fn with_workers(self, workers: usize) -> Self {
        Self { params: self.params.with_workers(workers) }
    }
}

impl BalSepLocal {
    /// Create the algorithm for the given width and balance factor.
    pub fn new(width: usize, balance_factor: usize) -> Result<Self, ParameterError> {
        Ok(Self { params: Params::new(width, balance_factor)? })
    }

    /// Use `workers` parallel search workers instead of the size of the rayon pool.
    pub fn with_workers(self, workers: usize) -> Self {
        Self { params: self.params.with_workers(workers) }
    }
}

impl BalSepHybrid {
    /// Create the algorithm for the given width and balance factor, switching after
    /// `depth` levels.
    pub fn new(width: usize, balance_factor: usize, depth: usize) -> Result<Self, ParameterError> {
        Ok(Self { params: Params::new(width, balance_factor)?, depth })
    }

    /// Use `workers` parallel search workers instead of the size of the rayon pool.
    pub fn with_workers(self, workers: usize) -> Self {
        Self { params: self.params.with_workers(workers), ..self }
    }
}

impl Algorithm for BalSepGlobal {
    fn name(&self) -> &'static str {
        "BalSepGlobal"
    }

    fn width(&self) -> usize {
        self.params.width
    }

    #[instrument(skip_all, fields(width = self.params.width, balance_factor = self.params.balance_factor))]
    fn find_decomposition(&self, graph: &Graph) -> Outcome {
        BalSep::new(graph, self.params, Universe::Global, None).run()
    }
}

impl Algorithm for BalSepLocal {
    fn name(&self) -> &'static str {
        "BalSepLocal"
    }

    fn width(&self) -> usize {
        self.params.width
    }

    #[instrument(skip_all, fields(width = self.params.width, balance_factor = self.params.balance_factor))]
    fn find_decomposition(&self, graph: &Graph) -> Outcome {
        BalSep::new(graph, self.params, Universe::Local, None).run()
    }
}

impl Algorithm for BalSepHybrid {
    fn name(&self) -> &'static str {
        "BalSepHybrid"
    }

    fn width(&self) -> usize {
        self.params.width
    }

    #[instrument(skip_all, fields(width = self.params.width, depth = self.depth))]
    fn find_decomposition(&self, graph: &Graph) -> Outcome {
        BalSep::new(graph, self.params, Universe::Global, Some(self.depth)).run()
    }
}

/// Where separator edges come from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Universe {
    Global,
    Local,
}

/// The state of one decomposition.
struct BalSep<'a> {
    graph: &'a Graph,
    params: Params,
    universe: Universe,
    switch_depth: Option<usize>,
    cache: Cache,
}

impl<'a> BalSep<'a> {
    fn new(graph: &'a Graph, params: Params, universe: Universe, switch_depth: Option<usize>) -> Self {
        Self { graph, params, universe, switch_depth, cache: Cache::default() }
    }

    fn run(&self) -> Outcome {
        let root = self.decompose(self.graph, 0);
        info!(found = root.is_some(), cache_entries = self.cache.len());
        root.map(|root| Decomp::new(self.graph.clone(), root)).into()
    }

    fn base_case(&self, sub: &Graph) -> Option<Node> {
        if sub.len() <= 2 {
            return small_base_case(sub, &[]);
        }
        if sub.edges().len() < self.params.width && sub.special().len() == 1 {
            let mut node = Node::new(sub.edges().vertices().to_vec(), sub.edges().clone(), vec![]);
            node.children.push(Node::leaf(sub.special()[0].clone()));
            return Some(node);
        }
        None
    }

    fn decompose(&self, sub: &Graph, depth: usize) -> Option<Node> {
        if let Some(node) = self.base_case(sub) {
            return Some(node);
        }
        if self.switch_depth.is_some_and(|d| depth >= d) {
            let mut cache = Cache::default();
            cache.alias(&self.cache);
            return DetKRun::new(self.graph, self.params, cache).find(sub, &[]);
        }

        let Params { width, balance_factor, .. } = self.params;
        let (universe, generators) = match self.universe {
            Universe::Global => {
                let universe = self.graph.edges().filter_vertices(sub.vertices());
                let generators = split(universe.len(), width.min(universe.len()), self.params.workers(), false);
                (universe, generators)
            }
            Universe::Local => {
                let universe = self.graph.edges().cut_vertices(sub.vertices());
                let generators = split(universe.len(), width, self.params.workers(), true);
                (universe, generators)
            }
        };

        let mut search = Search::with_generators(sub, &universe, balance_factor, generators);
        loop {
            search.find_next(&BalancedCheck);
            if search.exhausted() {
                trace!(depth, "no balanced separator left");
                return None;
            }
            let found = search.separator();
            debug!(separator = %found, depth, "balanced separator");
            if let Some(node) = self.try_separator(sub, &found, depth) {
                return Some(node);
            }

            let mut refiner = SubedgeRefiner::new(self.graph.edges(), &found, width);
            while let Some(separator) = refiner.next_separator(sub, balance_factor) {
                debug!(separator = %separator, depth, "subedge separator");
                if let Some(node) = self.try_separator(sub, &separator, depth) {
                    return Some(node);
                }
            }
        }
    }

    fn try_separator(&self, sub: &Graph, separator: &EdgeSet, depth: usize) -> Option<Node> {
        let special = separator.cut_vertices(sub.vertices());
        let components: Vec<_> =
            sub.components(separator).into_graphs().into_iter().map(|c| c.add_special(special.clone())).collect();
        if components.iter().any(|c| c.len() >= sub.len()) {
            return None;
        }
        if self.cache.check_negative(separator, &components) {
            debug!(separator = %separator, "known to fail");
            return None;
        }

        match decompose_all(&components, |c| self.decompose(c, depth + 1)) {
            Ok(children) => {
                for c in &components {
                    self.cache.add_positive(separator, c);
                }
                Some(combine(special.vertices().to_vec(), separator.clone(), children))
            }
            Err(i) => {
                debug!(separator = %separator, component = %components[i], "component failed");
                self.cache.add_negative(separator, &components[i]);
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Edge;
    use crate::index::Vertex;
    use crate::tests::{cycle_graph, path_graph};

    fn balsep(graph: &Graph, width: usize, universe: Universe) -> BalSep<'_> {
        BalSep::new(graph, Params::new(width, 2).unwrap(), universe, None)
    }

    /// The components `try_separator` hands to the recursion.
    fn components_of(sub: &Graph, separator: &EdgeSet) -> Vec<Graph> {
        let special = separator.cut_vertices(sub.vertices());
        sub.components(separator).into_graphs().into_iter().map(|c| c.add_special(special.clone())).collect()
    }

    #[test]
    fn early_termination() {
        let graph = path_graph(4);
        let sub = Graph::new(graph.edges().subset(&[0, 1])).add_special([Edge::new(9, [3, 7])].into_iter().collect());
        let node = balsep(&graph, 3, Universe::Global).base_case(&sub).unwrap();
        assert_eq!(node.cover().len(), 2);
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].cover(), &sub.special()[0]);

        assert!(balsep(&graph, 2, Universe::Global).base_case(&sub).is_none());
    }

    #[test]
    fn separators_become_special_edges() {
        let graph = path_graph(6);
        let run = balsep(&graph, 1, Universe::Global);
        let separator = graph.edges().subset(&[2]);
        let node = run.try_separator(&graph, &separator, 0).unwrap();
        assert_eq!(node.cover(), &separator);
        assert_eq!(node.bag(), separator.vertices());
        assert!(Decomp::new(graph.clone(), node).is_correct(&graph));
        let components: Vec<_> = graph
            .components(&separator)
            .into_graphs()
            .into_iter()
            .map(|c| c.add_special(separator.cut_vertices(graph.vertices())))
            .collect();
        assert!(components.iter().all(|c| run.cache.check_positive(&separator, c)));
    }

    #[test]
    fn local_separators_are_cut() {
        let graph = Graph::from_edges([(1, vec![1, 2, 3, 4]), (2, vec![4, 5]), (3, vec![5, 6]), (4, vec![6, 1])]);
        for universe in [Universe::Global, Universe::Local] {
            let decomp = balsep(&graph, 2, universe).run().into_decomp().unwrap();
            assert!(decomp.is_correct(&graph));
        }
    }

    #[test]
    fn hybrid_switches_to_detk() {
        let graph = cycle_graph(8);
        let run = BalSep::new(&graph, Params::new(2, 2).unwrap(), Universe::Global, Some(0));
        let decomp = run.run().into_decomp().unwrap();
        assert!(decomp.is_correct(&graph));

        let run = BalSep::new(&graph, Params::new(2, 2).unwrap(), Universe::Global, Some(1));
        let decomp = run.run().into_decomp().unwrap();
        assert!(decomp.is_correct(&graph));
        assert!(!run.cache.is_empty());
    }

    #[test]
    fn failed_separators_are_skipped() {
        // a 4-cycle with a tail 4-5-6-7, the cycle needs width 2
        let graph = Graph::from_edges([
            (1, vec![1, 2]),
            (2, vec![2, 3]),
            (3, vec![3, 4]),
            (4, vec![4, 1]),
            (5, vec![4, 5]),
            (6, vec![5, 6]),
            (7, vec![6, 7]),
        ]);
        let run = balsep(&graph, 1, Universe::Global);
        let separator = graph.edges().subset(&[4]);
        let components = components_of(&graph, &separator);
        assert!(!run.cache.check_negative(&separator, &components));

        assert!(run.try_separator(&graph, &separator, 0).is_none());
        assert!(run.cache.check_negative(&separator, &components));
        let entries = run.cache.len();
        assert!(run.try_separator(&graph, &separator, 0).is_none());
        assert_eq!(run.cache.len(), entries);

        // a separator that works is skipped once a component is known to fail
        let graph = path_graph(6);
        let run = balsep(&graph, 1, Universe::Global);
        let separator = graph.edges().subset(&[2]);
        for component in components_of(&graph, &separator) {
            run.cache.add_negative(&separator, &component);
        }
        assert!(run.try_separator(&graph, &separator, 0).is_none());
    }

    #[test]
    fn refined_separator_replaces_failed_one() {
        // e3 = {3, 4} is the first balanced separator; it is made to fail and the
        // subedge {4} of e3 takes its place
        let graph = path_graph(6);
        let run = BalSep::new(&graph, Params::new(1, 2).unwrap().with_workers(1), Universe::Global, None);
        let separator = graph.edges().subset(&[2]);
        for component in components_of(&graph, &separator) {
            run.cache.add_negative(&separator, &component);
        }

        let root = run.decompose(&graph, 0).unwrap();
        let cover = root.cover().edges();
        assert_eq!(cover.len(), 1);
        assert_eq!(cover[0].name().get(), 3);
        assert_eq!(cover[0].vertices(), &[Vertex::new(4)]);
        assert_eq!(root.bag(), &[Vertex::new(4)]);

        let decomp = Decomp::new(graph.clone(), root);
        assert!(decomp.is_correct(&graph));
        assert_eq!(decomp.width(), 1);
    }
}
