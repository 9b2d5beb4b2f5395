use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::graph::{Edge, Graph};

/// Edge `i` is `{i, i + 1}` for `i` in `1..=n`.
pub(crate) fn path_graph(n: u32) -> Graph {
    Graph::from_edges((1..=n).map(|i| (i, vec![i, i + 1])))
}

/// Edge `i` is `{i, i + 1}` for `i` in `1..n` and edge `n` is `{n, 1}`.
pub(crate) fn cycle_graph(n: u32) -> Graph {
    Graph::from_edges((1..=n).map(|i| (i, vec![i, if i == n { 1 } else { i + 1 }])))
}

/// The grid with binary edges between horizontally and vertically adjacent vertices.
pub(crate) fn grid_graph(rows: u32, cols: u32) -> Graph {
    let vertex = |r: u32, c: u32| r * cols + c + 1;
    let mut edges = vec![];
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                edges.push(vec![vertex(r, c), vertex(r, c + 1)]);
            }
            if r + 1 < rows {
                edges.push(vec![vertex(r, c), vertex(r + 1, c)]);
            }
        }
    }
    Graph::from_edges(edges.into_iter().zip(1..).map(|(vertices, name)| (name, vertices)))
}

/// Three ternary edges forming a cycle through the vertices 1, 3 and 5.
pub(crate) fn triangle_graph() -> Graph {
    Graph::from_edges([(1, vec![1, 2, 3]), (2, vec![3, 4, 5]), (3, vec![5, 6, 1])])
}

/// `num_edges` edges named `1..=num_edges` over the vertices `1..=num_vertices`, each
/// with between one and `max_arity` distinct vertices.
pub(crate) fn random_graph(seed: u64, num_vertices: u32, num_edges: u32, max_arity: usize) -> Graph {
    assert!(max_arity >= 1 && max_arity <= num_vertices as usize);
    let mut rng = StdRng::seed_from_u64(seed);
    let edges = (1..=num_edges)
        .map(|name| {
            let arity = rng.gen_range(1..=max_arity);
            let vertices = sample(&mut rng, num_vertices as usize, arity).into_iter().map(|v| v as u32 + 1);
            Edge::new(name, vertices)
        })
        .collect();
    Graph::new(edges)
}
