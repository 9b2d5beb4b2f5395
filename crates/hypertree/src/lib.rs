//! This is a library to compute [generalized hypertree decompositions](https://en.wikipedia.org/wiki/Hypertree_width) of bounded width.
//!
//! A hypertree decomposition of a hypergraph *H* is a rooted tree whose nodes carry a
//! *bag* of vertices and a *cover* of at most *k* edges containing the bag. Every edge
//! must lie inside some bag, and the nodes containing any given vertex must form a
//! connected subtree. The smallest *k* for which such a tree exists is the generalized
//! hypertree width of *H*.
//!
//! # Examples
//!
//! A cycle of length 4 has width 2.
//! ```rust
//! use hypertree::algorithms::{Algorithm, BalSepGlobal};
//! use hypertree::Graph;
//!
//! let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3]), (3, vec![3, 4]), (4, vec![4, 1])]);
//!
//! assert!(!BalSepGlobal::new(1, 2).unwrap().find_decomposition(&graph).is_found());
//!
//! let outcome = BalSepGlobal::new(2, 2).unwrap().find_decomposition(&graph);
//! let decomp = outcome.decomp().unwrap();
//! assert!(decomp.is_correct(&graph));
//! assert_eq!(decomp.width(), 2);
//! ```
//!
//! # Algorithms
//!
//! + [BalSepGlobal](algorithms::BalSepGlobal) and [BalSepLocal](algorithms::BalSepLocal)
//!   split the hypergraph at balanced separators and remember each separator as a special
//!   edge of the parts.
//! + [BalSepHybrid](algorithms::BalSepHybrid) switches to [DetK](algorithms::DetK) below
//!   a given depth.
//! + [DetK](algorithms::DetK) builds the tree top-down from the connection vertices.
//! + [LogK](algorithms::LogK) combines balanced child separators with parent separators
//!   and keeps the recursion depth logarithmic.
//!
//! All of them search for separators in parallel on the current
//! [rayon](https://docs.rs/rayon) thread pool.
//!
//! # References
//! + \[GLS02\]: Georg Gottlob, Nicola Leone, and Francesco Scarcello. “Hypertree
//!   Decompositions and Tractable Queries”. <https://doi.org/10.1006/jcss.2001.1809>.
//! + \[GOS22\]: Georg Gottlob, Cem Okulmus, and Reinhard Pichler. “Fast and Parallel
//!   Decomposition of Constraint Satisfaction Problems”. <https://doi.org/10.1007/s10601-022-09332-1>.

#![forbid(unsafe_code)]
#![doc(test(attr(deny(warnings, rust_2018_idioms), allow(dead_code))))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

/// Decomposition algorithms.
pub mod algorithms;
mod cache;
mod combin;
mod components;
mod decomp;
mod graph;
mod index;
mod predicate;
mod search;
mod set;
mod subedge;

#[cfg(test)]
mod tests;

pub use cache::Cache;
pub use combin::{split, CombinationIterator};
pub use components::Components;
pub use decomp::{Decomp, DisplayDecomp, Names, Node, Outcome};
pub use graph::{Edge, EdgeSet, Graph};
pub use index::{EdgeName, Vertex};
pub use predicate::{BalancedCheck, ConnectionCheck, ParentCheck, Predicate};
pub use search::Search;
pub use subedge::SubedgeRefiner;
