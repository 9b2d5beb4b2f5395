use hypertree::{Edge, Graph};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

/// A random hypergraph with `num_edges` edges over the vertices `1..=num_vertices`.
///
/// Each edge gets between `min_arity` and `max_arity` distinct vertices, chosen
/// uniformly. The same seed always produces the same hypergraph.
pub fn random_hypergraph(seed: u64, num_vertices: u32, num_edges: u32, min_arity: usize, max_arity: usize) -> Graph {
    assert!(1 <= min_arity && min_arity <= max_arity, "invalid arity range {min_arity}..={max_arity}");
    assert!(max_arity <= num_vertices as usize, "arity {max_arity} exceeds {num_vertices} vertices");
    let mut rng = StdRng::seed_from_u64(seed);
    let edges = (1..=num_edges)
        .map(|name| {
            let arity = rng.gen_range(min_arity..=max_arity);
            let vertices = sample(&mut rng, num_vertices as usize, arity).into_iter().map(|v| v as u32 + 1);
            Edge::new(name, vertices)
        })
        .collect();
    Graph::new(edges)
}

/// The cycle with `n` binary edges.
pub fn cycle(n: u32) -> Graph {
    Graph::from_edges((1..=n).map(|i| (i, vec![i, i % n + 1])))
}

/// The `rows` x `cols` grid with binary edges.
pub fn grid(rows: u32, cols: u32) -> Graph {
    let vertex = |r: u32, c: u32| r * cols + c + 1;
    let right = (0..rows).flat_map(|r| (1..cols).map(move |c| [vertex(r, c - 1), vertex(r, c)]));
    let down = (1..rows).flat_map(|r| (0..cols).map(move |c| [vertex(r - 1, c), vertex(r, c)]));
    Graph::from_edges(right.chain(down).zip(1..).map(|(vertices, name)| (name, vertices)))
}
