use clap::{Parser, Subcommand};
use common::instances::{cycle, grid, random_hypergraph};
use common::io::write_hyperbench;
use std::error::Error;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum Kind {
    /// Edges with uniformly chosen vertices.
    Random {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        vertices: u32,
        #[arg(long)]
        edges: u32,
        #[arg(long, default_value_t = 2)]
        min_arity: usize,
        #[arg(long, default_value_t = 3)]
        max_arity: usize,
    },
    Cycle {
        #[arg(long)]
        n: u32,
    },
    Grid {
        #[arg(long)]
        rows: u32,
        #[arg(long)]
        cols: u32,
    },
}

/// Write a hypergraph in HyperBench format.
#[derive(Debug, Parser)]
struct Cli {
    /// Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    kind: Kind,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let graph = match cli.kind {
        Kind::Random { seed, vertices, edges, min_arity, max_arity } => {
            if min_arity == 0 || min_arity > max_arity || max_arity > vertices as usize {
                return Err(format!("invalid arity range {min_arity}..={max_arity} for {vertices} vertices").into());
            }
            random_hypergraph(seed, vertices, edges, min_arity, max_arity)
        }
        Kind::Cycle { n } => cycle(n),
        Kind::Grid { rows, cols } => grid(rows, cols),
    };

    let mut out: Box<dyn Write> = match cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(stdout().lock()),
    };
    write_hyperbench(&mut out, &graph, None)?;
    Ok(())
}
