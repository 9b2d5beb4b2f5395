use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::{EdgeSet, Graph};
use crate::index::{EdgeName, Vertex};
use crate::set;

/// A node of a decomposition tree.
///
/// The bag is a sorted set of vertices and is covered by the vertices of the edges in
/// the cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub(crate) bag: Vec<Vertex>,
    pub(crate) cover: EdgeSet,
    pub(crate) children: Vec<Node>,
}

impl Node {
    /// Create a new node. `bag` has to be sorted and free of duplicates.
    pub fn new(bag: Vec<Vertex>, cover: EdgeSet, children: Vec<Node>) -> Self {
        debug_assert!(bag.windows(2).all(|w| w[0] < w[1]));
        Self { bag, cover, children }
    }

    /// Create a leaf whose bag consists of all vertices of the cover.
    pub fn leaf(cover: EdgeSet) -> Self {
        Self::new(cover.vertices().to_vec(), cover, vec![])
    }

    /// Return the sorted bag.
    #[inline(always)]
    pub fn bag(&self) -> &[Vertex] {
        &self.bag
    }

    /// Return the cover.
    #[inline(always)]
    pub fn cover(&self) -> &EdgeSet {
        &self.cover
    }

    /// Return the children.
    #[inline(always)]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Return the number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Return the largest cover size in this subtree.
    pub fn width(&self) -> usize {
        self.children.iter().map(Node::width).fold(self.cover.len(), usize::max)
    }

    /// Return the child indices leading to the first node (in preorder) that satisfies `f`.
    pub fn path_to(&self, f: &impl Fn(&Node) -> bool) -> Option<Vec<usize>> {
        if f(self) {
            return Some(vec![]);
        }
        self.children.iter().enumerate().find_map(|(i, child)| {
            let mut path = child.path_to(f)?;
            path.insert(0, i);
            Some(path)
        })
    }

    /// Return the first node (in preorder) that satisfies `f`.
    pub fn find_mut(&mut self, f: &impl Fn(&Node) -> bool) -> Option<&mut Node> {
        if f(self) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(f))
    }

    /// Make the node at the end of `path` the new root.
    ///
    /// Along the path, each node becomes the last child of its former child. The tree
    /// keeps its undirected shape.
    pub fn reroot(self, path: &[usize]) -> Node {
        let mut root = self;
        for &i in path {
            let mut child = root.children.remove(i);
            child.children.push(root);
            root = child;
        }
        root
    }

    /// Reroot at the first node satisfying `f`, if there is one.
    pub fn reroot_at(self, f: &impl Fn(&Node) -> bool) -> Option<Node> {
        let path = self.path_to(f)?;
        Some(self.reroot(&path))
    }

    fn add_to_digraph(&self, tree: &mut DiGraph<(Vec<Vertex>, EdgeSet), ()>) -> NodeIndex {
        let idx = tree.add_node((self.bag.clone(), self.cover.clone()));
        for child in &self.children {
            let child = child.add_to_digraph(tree);
            tree.add_edge(idx, child, ());
        }
        idx
    }
}

/// A decomposition of a graph.
#[derive(Clone, Debug)]
pub struct Decomp {
    graph: Graph,
    root: Node,
}

impl Decomp {
    /// Create a new decomposition of `graph`.
    pub fn new(graph: Graph, root: Node) -> Self {
        Self { graph, root }
    }

    /// Return the decomposed graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Return the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consume the decomposition and return the root node.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Return the width, the largest cover size of any node.
    pub fn width(&self) -> usize {
        self.root.width()
    }

    /// Return the number of nodes.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Convert to a [DiGraph] with edges pointing from parents to children.
    ///
    /// The root is the node with index 0. The node weights are the bags and covers.
    pub fn to_digraph(&self) -> DiGraph<(Vec<Vertex>, EdgeSet), ()> {
        let mut tree = DiGraph::with_capacity(self.node_count(), self.node_count().saturating_sub(1));
        self.root.add_to_digraph(&mut tree);
        tree
    }

    /// Check that this is a valid decomposition of `graph`.
    ///
    /// + Every bag is covered by the vertices of its cover.
    /// + Every edge of `graph` is contained in some bag.
    /// + For every vertex, the nodes whose bags contain it form a connected subtree.
    pub fn is_correct(&self, graph: &Graph) -> bool {
        let tree = self.to_digraph();

        if !tree.node_weights().all(|(bag, cover)| set::is_subset(bag, cover.vertices())) {
            return false;
        }

        let edges = graph.edges().iter().map(|e| e.vertices()).chain(graph.special().iter().map(|s| s.vertices()));
        for vertices in edges {
            if !tree.node_weights().any(|(bag, _)| set::is_subset(vertices, bag)) {
                return false;
            }
        }

        // In a forest, the number of components is the number of nodes minus the number of edges.
        let mut count: HashMap<Vertex, isize> = HashMap::new();
        for (bag, _) in tree.node_weights() {
            for v in bag {
                *count.entry(*v).or_default() += 1;
            }
        }
        for edge in tree.edge_references() {
            let (a, _) = &tree[edge.source()];
            let (b, _) = &tree[edge.target()];
            for v in set::intersection(a, b) {
                *count.entry(v).or_default() -= 1;
            }
        }
        count.values().all(|c| *c == 1)
    }

    /// Display the decomposition as an indented tree, using `names` for vertices and
    /// edges where available.
    pub fn display<'a>(&'a self, names: Option<&'a Names>) -> DisplayDecomp<'a> {
        DisplayDecomp { decomp: self, names }
    }
}

/// The result of a decomposition attempt.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// A decomposition of the requested width was found.
    Found(Decomp),
    /// There is no decomposition within the search space of the algorithm.
    NotFound,
}

impl Outcome {
    /// Returns whether a decomposition was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    /// Return the decomposition, if any.
    pub fn decomp(&self) -> Option<&Decomp> {
        match self {
            Outcome::Found(decomp) => Some(decomp),
            Outcome::NotFound => None,
        }
    }

    /// Consume the outcome and return the decomposition, if any.
    pub fn into_decomp(self) -> Option<Decomp> {
        match self {
            Outcome::Found(decomp) => Some(decomp),
            Outcome::NotFound => None,
        }
    }
}

impl From<Option<Decomp>> for Outcome {
    fn from(decomp: Option<Decomp>) -> Self {
        decomp.map_or(Outcome::NotFound, Outcome::Found)
    }
}

/// Display names for vertices and edges.
///
/// The names are only used for formatting. The algorithms work on the numeric
/// identifiers.
#[derive(Clone, Debug, Default)]
pub struct Names {
    vertices: HashMap<Vertex, String>,
    edges: HashMap<EdgeName, String>,
}

impl Names {
    /// Set the name of a vertex.
    pub fn insert_vertex(&mut self, vertex: Vertex, name: impl Into<String>) {
        self.vertices.insert(vertex, name.into());
    }

    /// Set the name of an edge.
    pub fn insert_edge(&mut self, edge: EdgeName, name: impl Into<String>) {
        self.edges.insert(edge, name.into());
    }

    /// Return the name of a vertex.
    pub fn vertex(&self, vertex: Vertex) -> Option<&str> {
        self.vertices.get(&vertex).map(String::as_str)
    }

    /// Return the name of an edge.
    pub fn edge(&self, edge: EdgeName) -> Option<&str> {
        self.edges.get(&edge).map(String::as_str)
    }
}

/// Formats a [Decomp]. Created by [Decomp::display].
#[derive(Debug)]
pub struct DisplayDecomp<'a> {
    decomp: &'a Decomp,
    names: Option<&'a Names>,
}

impl DisplayDecomp<'_> {
    fn vertex(&self, f: &mut Formatter<'_>, v: Vertex) -> std::fmt::Result {
        match self.names.and_then(|names| names.vertex(v)) {
            Some(name) => f.write_str(name),
            None => write!(f, "{v}"),
        }
    }

    fn edge(&self, f: &mut Formatter<'_>, e: EdgeName) -> std::fmt::Result {
        match self.names.and_then(|names| names.edge(e)) {
            Some(name) => f.write_str(name),
            None => write!(f, "{e}"),
        }
    }

    fn node(&self, f: &mut Formatter<'_>, node: &Node, depth: usize) -> std::fmt::Result {
        write!(f, "{:indent$}Bag: {{", "", indent = 2 * depth)?;
        for (i, v) in node.bag.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.vertex(f, *v)?;
        }
        f.write_str("}, Cover: {")?;
        for (i, e) in node.cover.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.edge(f, e.name())?;
        }
        f.write_str("}\n")?;
        for child in &node.children {
            self.node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl Display for DisplayDecomp<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.node(f, &self.decomp.root, 0)
    }
}
