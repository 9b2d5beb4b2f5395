use std::fmt::{Debug, Display, Formatter};

use rayon::prelude::*;

use crate::decomp::{Node, Outcome};
use crate::graph::{EdgeSet, Graph};
use crate::index::Vertex;
use crate::set;

mod balsep;
mod detk;
mod logk;

pub use balsep::{BalSepGlobal, BalSepHybrid, BalSepLocal};
pub use detk::DetK;
pub use logk::LogK;

/// A decomposition algorithm with a fixed width bound.
///
/// ```rust
/// use hypertree::algorithms::{Algorithm, BalSepGlobal};
/// use hypertree::Graph;
///
/// let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3]), (3, vec![3, 1])]);
///
/// let outcome = BalSepGlobal::new(1, 2).unwrap().find_decomposition(&graph);
/// assert!(!outcome.is_found());
///
/// let outcome = BalSepGlobal::new(2, 2).unwrap().find_decomposition(&graph);
/// let decomp = outcome.decomp().unwrap();
/// assert!(decomp.is_correct(&graph));
/// assert!(decomp.width() <= 2);
/// ```
pub trait Algorithm: Debug + Sync {
    /// A short name for reports.
    fn name(&self) -> &'static str;

    /// Return the width bound.
    fn width(&self) -> usize;

    /// Search for a decomposition of `graph` whose covers have at most [Algorithm::width]
    /// edges.
    fn find_decomposition(&self, graph: &Graph) -> Outcome;
}

/// Invalid parameters for an algorithm.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParameterError {
    /// The width has to be at least one.
    ZeroWidth,
    /// The balance factor has to be at least two.
    BalanceFactor(usize),
}

impl Display for ParameterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::ZeroWidth => f.write_str("width must be at least 1"),
            ParameterError::BalanceFactor(bf) => write!(f, "balance factor must be at least 2, got {bf}"),
        }
    }
}

impl std::error::Error for ParameterError {}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Params {
    pub(crate) width: usize,
    pub(crate) balance_factor: usize,
    workers: Option<usize>,
}

impl Params {
    pub(crate) fn new(width: usize, balance_factor: usize) -> Result<Self, ParameterError> {
        if width == 0 {
            return Err(ParameterError::ZeroWidth);
        }
        if balance_factor < 2 {
            return Err(ParameterError::BalanceFactor(balance_factor));
        }
        Ok(Self { width, balance_factor, workers: None })
    }

    pub(crate) fn with_workers(self, workers: usize) -> Self {
        Self { workers: Some(workers.max(1)), ..self }
    }

    /// The number of search workers. Defaults to the size of the current rayon pool.
    pub(crate) fn workers(&self) -> usize {
        self.workers.unwrap_or_else(rayon::current_num_threads).max(1)
    }
}

/// The edges (each on its own) and the special edges of a graph, special edges first.
fn pieces(graph: &Graph) -> Vec<EdgeSet> {
    let edges = graph.edges().iter().map(|e| EdgeSet::new(vec![e.clone()]));
    graph.special().iter().cloned().chain(edges).collect()
}

/// Decompose a graph with at most two pieces.
///
/// The first piece that covers `conn` becomes the root, the other piece its child.
/// Returns `None` if no piece covers `conn`.
pub(crate) fn small_base_case(graph: &Graph, conn: &[Vertex]) -> Option<Node> {
    debug_assert!(graph.len() <= 2);
    let mut pieces = pieces(graph);
    if pieces.is_empty() {
        return conn.is_empty().then(|| Node::new(vec![], EdgeSet::default(), vec![]));
    }
    let root = pieces.iter().position(|p| set::is_subset(conn, p.vertices()))?;
    let mut root = Node::leaf(pieces.swap_remove(root));
    root.children.extend(pieces.into_iter().map(Node::leaf));
    Some(root)
}

/// Decompose every component in parallel.
///
/// Returns the roots in the order of the components, or the index of a component that
/// failed. The remaining components are abandoned once a failure is seen.
pub(crate) fn decompose_all<F>(components: &[Graph], f: F) -> Result<Vec<Node>, usize>
where
    F: Fn(&Graph) -> Option<Node> + Send + Sync,
{
    components.par_iter().enumerate().map(|(i, c)| f(c).ok_or(i)).collect()
}

/// Attach the decompositions of the components below a new node with the given bag.
///
/// Each subtree is rerooted at its first node whose bag contains the bag of the new
/// node. If that node has the same bag, its children are attached directly.
pub(crate) fn combine(bag: Vec<Vertex>, cover: EdgeSet, children: Vec<Node>) -> Node {
    let mut node = Node::new(bag, cover, vec![]);
    for child in children {
        let child = child
            .reroot_at(&|n: &Node| set::is_subset(&node.bag, &n.bag))
            .expect("every subtree contains a node with the separator vertices");
        if child.bag == node.bag {
            node.children.extend(child.children);
        } else {
            node.children.push(child);
        }
    }
    node
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Edge;
    use crate::tests::{cycle_graph, grid_graph, path_graph, random_graph, triangle_graph};
    use crate::Decomp;

    fn all_algorithms(width: usize) -> Vec<Box<dyn Algorithm>> {
        vec![
            Box::new(BalSepGlobal::new(width, 2).unwrap()),
            Box::new(BalSepLocal::new(width, 2).unwrap()),
            Box::new(BalSepHybrid::new(width, 2, 1).unwrap()),
            Box::new(DetK::new(width).unwrap()),
            Box::new(LogK::new(width, 2).unwrap()),
        ]
    }

    fn assert_found(algorithm: &dyn Algorithm, graph: &Graph) {
        let outcome = algorithm.find_decomposition(graph);
        let decomp = outcome.decomp().unwrap_or_else(|| panic!("{} found no decomposition", algorithm.name()));
        assert!(decomp.is_correct(graph), "{}:\n{}", algorithm.name(), decomp.display(None));
        assert!(decomp.width() <= algorithm.width());
    }

    #[test]
    fn parameters() {
        assert_eq!(Params::new(0, 2).unwrap_err(), ParameterError::ZeroWidth);
        assert_eq!(Params::new(2, 1).unwrap_err(), ParameterError::BalanceFactor(1));
        assert!(DetK::new(0).is_err());
        assert!(BalSepHybrid::new(1, 0, 1).is_err());
        assert_eq!(Params::new(2, 2).unwrap().with_workers(0).workers(), 1);
        assert_eq!(ParameterError::BalanceFactor(1).to_string(), "balance factor must be at least 2, got 1");
    }

    #[test]
    fn small_base_cases() {
        let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3])]);
        let root = small_base_case(&graph, &[]).unwrap();
        assert_eq!(root.cover(), &graph.edges().subset(&[0]));
        assert_eq!(root.children().len(), 1);

        let root = small_base_case(&graph, &[Vertex::new(3)]).unwrap();
        assert_eq!(root.cover(), &graph.edges().subset(&[1]));
        assert!(small_base_case(&graph, &[Vertex::new(1), Vertex::new(3)]).is_none());

        // the special edge becomes the root
        let graph = Graph::from_edges([(1, vec![1, 2])]).add_special([Edge::new(5, [2, 3])].into_iter().collect());
        let root = small_base_case(&graph, &[]).unwrap();
        assert_eq!(root.cover(), &graph.special()[0]);

        let root = small_base_case(&Graph::default(), &[]).unwrap();
        assert!(root.bag().is_empty() && root.cover().is_empty());
    }

    #[test]
    fn combine_splices_duplicate_nodes() {
        let separator = path_graph(4).edges().subset(&[1]);
        let special = separator.clone();
        // {e1} below the special edge, and {e3, e4} with the special edge as a leaf
        let mut left = Node::leaf(special.clone());
        left.children.push(Node::leaf(path_graph(4).edges().subset(&[0])));
        let mut right = Node::leaf(path_graph(4).edges().subset(&[2]));
        right.children.push(Node::leaf(path_graph(4).edges().subset(&[3])));
        right.children.push(Node::leaf(special));

        let node = combine(separator.vertices().to_vec(), separator.clone(), vec![left, right]);
        assert_eq!(node.cover(), &separator);
        // the special leaves are spliced out
        assert_eq!(node.node_count(), 4);
        let graph = path_graph(4);
        assert!(Decomp::new(graph.clone(), node).is_correct(&graph));
    }

    #[test]
    fn decompose_all_reports_failure() {
        let graphs = vec![path_graph(1), path_graph(2), path_graph(3)];
        let result = decompose_all(&graphs, |g| (g.len() != 2).then(|| Node::leaf(g.edges().clone())));
        assert_eq!(result.unwrap_err(), 1);
        let result = decompose_all(&graphs, |g| Some(Node::leaf(g.edges().clone())));
        assert_eq!(result.unwrap().len(), 3);
    }

    #[test]
    fn acyclic_graphs_have_width_one() {
        for algorithm in all_algorithms(1) {
            assert_found(algorithm.as_ref(), &path_graph(1));
            assert_found(algorithm.as_ref(), &path_graph(2));
            assert_found(algorithm.as_ref(), &path_graph(9));
        }
    }

    #[test]
    fn empty_graph() {
        for algorithm in all_algorithms(1) {
            let decomp = algorithm.find_decomposition(&Graph::default()).into_decomp().unwrap();
            assert_eq!(decomp.node_count(), 1);
        }
    }

    #[test]
    fn cycles_need_width_two() {
        for n in [3, 6] {
            let graph = cycle_graph(n);
            for algorithm in all_algorithms(1) {
                let outcome = algorithm.find_decomposition(&graph);
                assert!(!outcome.is_found(), "{} decomposed a cycle of length {n} with width 1", algorithm.name());
            }
            for algorithm in all_algorithms(2) {
                assert_found(algorithm.as_ref(), &graph);
            }
        }
    }

    #[test]
    fn triangle_and_grid() {
        let triangle = triangle_graph();
        for algorithm in all_algorithms(2) {
            assert_found(algorithm.as_ref(), &triangle);
        }
        let grid = grid_graph(3, 3);
        for algorithm in all_algorithms(3) {
            assert_found(algorithm.as_ref(), &grid);
        }
    }

    #[test]
    fn algorithms_agree_on_random_graph() {
        let graph = random_graph(7, 8, 10, 3);
        assert_eq!(graph.edges().len(), 10);
        let algorithms: Vec<Box<dyn Algorithm>> = vec![
            Box::new(BalSepGlobal::new(3, 2).unwrap()),
            Box::new(BalSepLocal::new(3, 2).unwrap()),
            Box::new(BalSepHybrid::new(3, 2, 1).unwrap()),
            Box::new(DetK::new(3).unwrap()),
        ];
        let outcomes: Vec<_> = algorithms.iter().map(|a| a.find_decomposition(&graph)).collect();
        for (algorithm, outcome) in algorithms.iter().zip(&outcomes) {
            assert_eq!(outcome.is_found(), outcomes[0].is_found(), "{} disagrees", algorithm.name());
            if let Some(decomp) = outcome.decomp() {
                assert!(decomp.is_correct(&graph));
                assert!(decomp.width() <= 3);
            }
        }
    }

    #[test]
    fn random_graphs_round_trip() {
        for seed in 0..6 {
            let graph = random_graph(seed, 9, 8, 3);
            for algorithm in all_algorithms(2) {
                if let Some(decomp) = algorithm.find_decomposition(&graph).decomp() {
                    assert!(decomp.is_correct(&graph), "{} seed={seed}", algorithm.name());
                    assert!(decomp.width() <= 2);
                }
            }
        }
    }

    #[test]
    fn worker_count_does_not_change_the_answer() {
        let graph = cycle_graph(7);
        for workers in [1, 2, 5] {
            let decomp = BalSepLocal::new(2, 2).unwrap().with_workers(workers).find_decomposition(&graph);
            assert!(decomp.decomp().unwrap().is_correct(&graph));
            assert!(!DetK::new(1).unwrap().with_workers(workers).find_decomposition(&graph).is_found());
        }
    }
}
