use std::collections::{HashMap, HashSet};

use petgraph::unionfind::UnionFind;

use crate::graph::{Edge, EdgeSet, Graph};
use crate::index::{EdgeName, Vertex};
use crate::set;

/// The connected pieces of a graph after removing the vertices of a separator.
#[derive(Clone, Debug)]
pub struct Components {
    graphs: Vec<Graph>,
    edge_component: HashMap<EdgeName, usize>,
    isolated: Vec<Edge>,
    isolated_special: Vec<EdgeSet>,
}

impl Components {
    /// The components as sub-graphs. Each keeps the special edges that belong to it.
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Consume the components and return the sub-graphs.
    pub fn into_graphs(self) -> Vec<Graph> {
        self.graphs
    }

    /// Return the number of components.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Returns whether there is no component.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Return the index of the component containing the edge, if any.
    pub fn component_of(&self, name: EdgeName) -> Option<usize> {
        self.edge_component.get(&name).copied()
    }

    /// The edges whose vertices are all inside the separator.
    pub fn isolated(&self) -> &[Edge] {
        &self.isolated
    }

    /// The special edges whose vertices are all inside the separator.
    pub fn isolated_special(&self) -> &[EdgeSet] {
        &self.isolated_special
    }
}

/// Component labels of the edges and special edges. `None` marks isolated ones.
pub(crate) struct Labeling {
    pub(crate) edges: Vec<Option<usize>>,
    pub(crate) special: Vec<Option<usize>>,
    pub(crate) count: usize,
}

impl Labeling {
    /// The weight (edges plus special edges) of every component.
    pub(crate) fn weights(&self) -> Vec<usize> {
        let mut weights = vec![0; self.count];
        for label in self.edges.iter().chain(self.special.iter()).flatten() {
            weights[*label] += 1;
        }
        weights
    }

    /// The sorted vertices of one component.
    pub(crate) fn vertices(&self, graph: &Graph, component: usize) -> Vec<Vertex> {
        let edges =
            graph.edges().iter().zip(&self.edges).filter(|(_, l)| **l == Some(component)).map(|(e, _)| e.vertices());
        let special =
            graph.special().iter().zip(&self.special).filter(|(_, l)| **l == Some(component)).map(|(s, _)| s.vertices());
        set::collect_sorted(edges.chain(special).flat_map(|vs| vs.iter().copied()))
    }
}

impl Graph {
    /// Label the edges and special edges by their component after removing the vertices
    /// of `separator`.
    ///
    /// Vertices outside the separator that occur together in an edge are joined in a
    /// union-find structure. An edge then belongs to the component of any of its
    /// vertices outside the separator.
    pub(crate) fn label_components(&self, separator: &EdgeSet) -> Labeling {
        let vertices = self.vertices();
        let separator: HashSet<Vertex> = separator.vertices().iter().copied().collect();
        let position = |v: &Vertex| vertices.binary_search(v).expect("edge vertices are vertices of the graph");

        let mut uf = UnionFind::<usize>::new(vertices.len());
        let mut join = |edge: &[Vertex]| {
            let mut outside = edge.iter().filter(|v| !separator.contains(*v)).map(position);
            if let Some(mut prev) = outside.next() {
                for u in outside {
                    uf.union(prev, u);
                    prev = u;
                }
            }
        };
        for e in self.edges() {
            join(e.vertices());
        }
        for s in self.special() {
            join(s.vertices());
        }

        let mut component_of_root = vec![usize::MAX; vertices.len()];
        let mut count = 0;
        let mut label = |edge: &[Vertex]| -> Option<usize> {
            let v = edge.iter().find(|v| !separator.contains(*v))?;
            let root = uf.find_mut(position(v));
            if component_of_root[root] == usize::MAX {
                component_of_root[root] = count;
                count += 1;
            }
            Some(component_of_root[root])
        };
        let edges = self.edges().iter().map(|e| label(e.vertices())).collect();
        let special = self.special().iter().map(|s| label(s.vertices())).collect();
        Labeling { edges, special, count }
    }

    /// Split the graph into its connected components after removing the vertices of
    /// `separator`.
    ///
    /// ```rust
    /// use hypertree::{EdgeSet, Graph};
    ///
    /// let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3]), (3, vec![3, 4]), (4, vec![4, 5])]);
    /// let separator: EdgeSet = graph.edges().subset(&[1]);
    /// let components = graph.components(&separator);
    ///
    /// assert_eq!(components.len(), 2);
    /// assert_eq!(components.isolated().len(), 1);
    /// ```
    pub fn components(&self, separator: &EdgeSet) -> Components {
        let labeling = self.label_components(separator);

        let mut edges = vec![vec![]; labeling.count];
        let mut special = vec![vec![]; labeling.count];
        let mut edge_component = HashMap::with_capacity(self.edges().len());
        let mut isolated = vec![];
        let mut isolated_special = vec![];

        for (e, label) in self.edges().iter().zip(&labeling.edges) {
            match label {
                Some(i) => {
                    edges[*i].push(e.clone());
                    edge_component.insert(e.name(), *i);
                }
                None => isolated.push(e.clone()),
            }
        }
        for (s, label) in self.special().iter().zip(&labeling.special) {
            match label {
                Some(i) => special[*i].push(s.clone()),
                None => isolated_special.push(s.clone()),
            }
        }

        let graphs = edges
            .into_iter()
            .zip(special)
            .map(|(edges, special)| Graph::with_special(EdgeSet::new(edges), special))
            .collect();
        Components { graphs, edge_component, isolated, isolated_special }
    }
}
